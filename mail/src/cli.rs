use clap::Parser;
use session::cli::LogLevel;
use session::settings::ServerArgs;

use crate::models::Mailbox;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Mailbox shown on start
    #[arg(short, long, value_enum, default_value_t = Mailbox::Inbox)]
    pub mailbox: Mailbox,

    /// Attach the anti-forgery header to read and archive updates
    #[arg(long)]
    pub sign_updates: bool,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
