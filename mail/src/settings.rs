use log::debug;
use serde::Deserialize;
use session::settings::{ServerSettings, config_file_path, load_config_file};

use crate::cli::Args;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(flatten)]
    pub server: ServerSettings,
    pub sign_updates: Option<bool>,
}

const CONFIG_FILE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn merge_settings_with_args(args: &Args) -> anyhow::Result<Args> {
    let mut new_args = args.clone();

    if let Some(config_path) = config_file_path(CONFIG_FILE_NAME) {
        if let Some(settings) = load_config_file::<Settings>(&config_path)? {
            apply_settings(&mut new_args, &settings);
        }
    }

    debug!(
        "merged config: url={} sign_updates={}",
        new_args.server.url, new_args.sign_updates
    );

    Ok(new_args)
}

pub fn apply_settings(args: &mut Args, settings: &Settings) {
    args.server.merge(&settings.server);

    if !args.sign_updates {
        if let Some(sign_updates) = settings.sign_updates {
            args.sign_updates = sign_updates;
        }
    }
}
