use anyhow::{Context, Result};
use log::info;

use crate::api::ApplicantApi;
use crate::form::ApplicationForm;
use crate::models::{ApplicationAction, Decision, ProfileForm};

/// Sends the five profile fields of `form` to the edit endpoint of `user_id`.
pub async fn submit_profile(
    api: &impl ApplicantApi,
    user_id: u64,
    form: &ProfileForm,
) -> Result<serde_json::Value> {
    let profile = form.read()?;

    let data = api
        .update_profile(user_id, &profile)
        .await
        .with_context(|| format!("Failed to update profile {user_id}"))?;

    info!("{data}");

    Ok(data)
}

pub async fn submit_application(
    api: &impl ApplicantApi,
    college_id: u64,
    form: &ApplicationForm,
    action: ApplicationAction,
) -> Result<()> {
    api.save_application(college_id, &form.pairs(), action)
        .await
        .with_context(|| format!("Failed to send {} for college {college_id}", action.marker()))?;

    info!("application for college {college_id}: {}", action.marker());

    Ok(())
}

pub async fn decide(
    api: &impl ApplicantApi,
    college: &str,
    profile: &str,
    decision: Decision,
) -> Result<()> {
    api.decide(college, profile, decision).await?;

    info!("{profile} at {college}: {}", decision.marker());

    Ok(())
}
