use std::{fs, path::Path};

use anyhow::{Context, Result};
use inquire::{Confirm, Editor, Text};
use owo_colors::OwoColorize;
use session::Session;

use crate::actions;
use crate::api::ApplicantClient;
use crate::cli::{Args, Command};
use crate::form::{ApplicationForm, render_questions, render_questions_with_answers};
use crate::models::{ApplicationAction, PROFILE_FIELDS, ProfileForm};
use crate::settings::merge_settings_with_args;

pub async fn run(args: Args) -> Result<()> {
    let args = merge_settings_with_args(&args)?;
    let client = ApplicantClient::new(Session::new(&args.server.session_config())?);

    match args.command {
        Command::Profile {
            id,
            age,
            gender,
            ethnicity,
            military,
            picture,
        } => {
            let form = prompt_profile([age, gender, ethnicity, military, picture])?;
            actions::submit_profile(&client, id, &form).await?;
            println!("{} Profile {} updated", "✓".bright_green(), id.bright_cyan());
        }
        Command::Apply {
            college_id,
            questions,
            answers,
            submit,
        } => {
            let questions = read_json_list(&questions)?;

            let mut form = ApplicationForm::new();
            match answers {
                Some(path) => {
                    render_questions_with_answers(&mut form, &questions, &read_json_list(&path)?)?
                }
                None => render_questions(&mut form, &questions),
            }

            fill_answers(&mut form)?;
            println!("\n{form}");

            let action = if submit {
                ApplicationAction::Submit
            } else {
                ApplicationAction::Save
            };

            let confirm = Confirm::new(&format!("{} these answers?", action.marker().replace('_', " ")))
                .with_default(true)
                .prompt()
                .context("Failed to get confirmation")?;

            if !confirm {
                println!("\n{} Nothing sent.", "✗".yellow());
                return Ok(());
            }

            actions::submit_application(&client, college_id, &form, action).await?;
            println!("{} Application sent", "✓".bright_green());
        }
        Command::Decide {
            college,
            profile,
            decision,
        } => {
            actions::decide(&client, &college, &profile, decision).await?;
            println!(
                "{} {} {}",
                "✓".bright_green(),
                profile.bright_cyan(),
                decision.marker()
            );
        }
    }

    Ok(())
}

fn read_json_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse a JSON list of strings from {}", path.display()))
}

fn prompt_profile(given: [Option<String>; 5]) -> Result<ProfileForm> {
    let mut form = ProfileForm::new();

    for (name, value) in PROFILE_FIELDS.iter().zip(given) {
        let value = match value {
            Some(value) => value,
            None => Text::new(&format!("{name}:"))
                .prompt()
                .with_context(|| format!("Failed to get {name}"))?,
        };
        form.set(name, value);
    }

    Ok(form)
}

fn fill_answers(form: &mut ApplicationForm) -> Result<()> {
    for field in form.fields.iter_mut() {
        field.value = Editor::new(&field.label)
            .with_predefined_text(&field.value)
            .with_file_extension(".txt")
            .prompt()
            .with_context(|| format!("Failed to get {}", field.name))?;
    }

    Ok(())
}
