use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type PostId = u64;

/// Text of a post's like button. The viewer's liked state is read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeLabel {
    Like,
    Unlike,
}

impl LikeLabel {
    pub fn for_liked(liked: bool) -> Self {
        if liked { LikeLabel::Unlike } else { LikeLabel::Like }
    }

    pub fn from_label(label: &str) -> anyhow::Result<Self> {
        match label {
            "Like" => Ok(LikeLabel::Like),
            "Unlike" => Ok(LikeLabel::Unlike),
            other => Err(anyhow::anyhow!("unknown like button label {other:?}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LikeLabel::Like => "Like",
            LikeLabel::Unlike => "Unlike",
        }
    }

    pub fn is_liked(self) -> bool {
        self == LikeLabel::Unlike
    }

    pub fn toggled(self) -> Self {
        match self {
            LikeLabel::Like => LikeLabel::Unlike,
            LikeLabel::Unlike => LikeLabel::Like,
        }
    }
}

impl fmt::Display for LikeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as it was shown on the page the feed starts from.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PostSnapshot {
    pub id: PostId,
    pub message: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub liked: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PostEdit {
    pub message: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerMessage {
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

/// What to do with an optimistic edit the server did not accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReconcilePolicy {
    /// Leave the edited text on screen
    #[default]
    Keep,
    /// Put back the last text the server accepted
    Rollback,
}
