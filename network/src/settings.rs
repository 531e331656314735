use log::debug;
use serde::Deserialize;
use session::settings::{ServerSettings, config_file_path, load_config_file};

use crate::cli::Args;
use crate::models::ReconcilePolicy;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(flatten)]
    pub server: ServerSettings,
    pub reconcile: Option<ReconcilePolicy>,
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
        "merged config: url={} reconcile={:?}",
        new_args.server.url, new_args.reconcile
    );

    Ok(new_args)
}

pub fn apply_settings(args: &mut Args, settings: &Settings) {
    args.server.merge(&settings.server);

    if args.reconcile == ReconcilePolicy::default() {
        if let Some(reconcile) = settings.reconcile {
            args.reconcile = reconcile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_reconcile_policy_from_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "url = \"http://localhost:8000\"\nreconcile = \"rollback\"\n").unwrap();

        let settings: Settings = load_config_file(&path).unwrap().unwrap();
        let mut args = Args::parse_from(["network", "follow", "alice"]);
        apply_settings(&mut args, &settings);

        assert_eq!(args.reconcile, ReconcilePolicy::Rollback);
        assert_eq!(args.server.url, "http://localhost:8000");
    }

    #[test]
    fn test_unknown_reconcile_policy_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "reconcile = \"retry\"\n").unwrap();

        assert!(load_config_file::<Settings>(&path).is_err());
    }
}
