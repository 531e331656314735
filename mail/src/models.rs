use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type EmailId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mailbox {
    Inbox,
    Sent,
    Archive,
}

impl Mailbox {
    pub const ALL: [Mailbox; 3] = [Mailbox::Inbox, Mailbox::Sent, Mailbox::Archive];

    pub fn as_str(self) -> &'static str {
        match self {
            Mailbox::Inbox => "inbox",
            Mailbox::Sent => "sent",
            Mailbox::Archive => "archive",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Mailbox::Inbox => "Inbox",
            Mailbox::Sent => "Sent",
            Mailbox::Archive => "Archive",
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mailbox {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mailbox::ALL
            .into_iter()
            .find(|mailbox| mailbox.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown mailbox {s}"))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Email {
    pub id: EmailId,
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NewEmail {
    /// Comma separated addresses, exactly as typed.
    pub recipients: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmailChangeset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl EmailChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = Some(read);
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SendResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}
