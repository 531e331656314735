use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use session::{Session, ensure_success};

use crate::models::{ApplicationAction, Decision, ProfileUpdate};

#[async_trait]
pub trait ApplicantApi {
    async fn update_profile(&self, user_id: u64, profile: &ProfileUpdate) -> Result<serde_json::Value>;
    async fn save_application(
        &self,
        college_id: u64,
        answers: &[(String, String)],
        action: ApplicationAction,
    ) -> Result<()>;
    async fn decide(&self, college: &str, profile: &str, decision: Decision) -> Result<()>;
}

pub struct ApplicantClient {
    session: Session,
}

impl ApplicantClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ApplicantApi for ApplicantClient {
    async fn update_profile(&self, user_id: u64, profile: &ProfileUpdate) -> Result<serde_json::Value> {
        let request = self.session.post(&format!("edit/{user_id}")).json(profile);

        let response = self.session.signed(request).send().await?;
        let response = ensure_success(response, "update profile").await?;

        let data: serde_json::Value = response.json().await?;

        Ok(data)
    }

    async fn save_application(
        &self,
        college_id: u64,
        answers: &[(String, String)],
        action: ApplicationAction,
    ) -> Result<()> {
        let mut form: Vec<(&str, &str)> = answers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        form.push((action.marker(), action.marker()));

        debug!("{} answers for college {}", answers.len(), college_id);

        let request = self.session.post(&format!("apply/{college_id}")).form(&form);
        let response = self.session.signed(request).send().await?;
        ensure_success(response, "save application").await?;

        Ok(())
    }

    async fn decide(&self, college: &str, profile: &str, decision: Decision) -> Result<()> {
        let request = self
            .session
            .post(&format!("profile/{college}/{profile}"))
            .form(&[(decision.marker(), decision.marker())]);

        let response = self.session.signed(request).send().await?;
        ensure_success(response, "record decision").await?;

        Ok(())
    }
}
