use std::path::PathBuf;

use clap::{Parser, Subcommand};
use session::cli::LogLevel;
use session::settings::ServerArgs;

use crate::models::ReconcilePolicy;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// What to do with an edit the server rejects
    #[arg(long, value_enum, default_value_t = ReconcilePolicy::Keep)]
    pub reconcile: ReconcilePolicy,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Like and edit the posts of a feed page
    Feed {
        /// JSON list of {id, message, likes, liked}
        snapshot: PathBuf,
    },

    /// Follow a user
    Follow { username: String },

    /// Stop following a user
    Unfollow { username: String },

    /// Write a new post
    Post { message: String },
}
