use log::debug;
use serde::Deserialize;
use session::settings::{ServerSettings, config_file_path, load_config_file};

use crate::cli::Args;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(flatten)]
    pub server: ServerSettings,
}

const CONFIG_FILE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn merge_settings_with_args(args: &Args) -> anyhow::Result<Args> {
    let mut new_args = args.clone();

    if let Some(config_path) = config_file_path(CONFIG_FILE_NAME) {
        if let Some(settings) = load_config_file::<Settings>(&config_path)? {
            new_args.server.merge(&settings.server);
        }
    }

    debug!("merged server config: {}", new_args.server.url);

    Ok(new_args)
}
