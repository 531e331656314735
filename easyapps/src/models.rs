use std::collections::BTreeMap;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

pub const PROFILE_FIELDS: [&str; 5] = ["age", "gender", "ethnicity", "military", "picture"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub age: String,
    pub gender: String,
    pub ethnicity: String,
    pub military: String,
    pub picture: String,
}

/// Named input values of the profile page, keyed by input id.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    values: BTreeMap<String, String>,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn read(&self) -> Result<ProfileUpdate> {
        let field = |name: &str| -> Result<String> {
            self.get(name)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("profile field {name} is missing"))
        };

        Ok(ProfileUpdate {
            age: field("age")?,
            gender: field("gender")?,
            ethnicity: field("ethnicity")?,
            military: field("military")?,
            picture: field("picture")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApplicationAction {
    /// Keep the answers as a draft
    Save,
    /// Hand the application in
    Submit,
}

impl ApplicationAction {
    pub fn marker(self) -> &'static str {
        match self {
            ApplicationAction::Save => "save_application",
            ApplicationAction::Submit => "submit_application",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Decision {
    Accept,
    Deny,
}

impl Decision {
    pub fn marker(self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Deny => "deny",
        }
    }
}
