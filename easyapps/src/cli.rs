use std::path::PathBuf;

use clap::{Parser, Subcommand};
use session::cli::LogLevel;
use session::settings::ServerArgs;

use crate::models::Decision;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Update an applicant profile, prompting for fields not given
    Profile {
        /// User id of the profile
        id: u64,

        #[arg(long)]
        age: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        ethnicity: Option<String>,

        #[arg(long)]
        military: Option<String>,

        /// Picture URL
        #[arg(long)]
        picture: Option<String>,
    },

    /// Answer the essay questions of a college
    Apply {
        /// College id
        college_id: u64,

        /// JSON file with the list of questions
        #[arg(long)]
        questions: PathBuf,

        /// JSON file with previously saved answers
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Submit the application instead of saving a draft
        #[arg(long)]
        submit: bool,
    },

    /// Accept or deny an application
    Decide {
        /// College name
        college: String,

        /// Username of the applicant
        profile: String,

        decision: Decision,
    },
}
