use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Args;
use config::{Config, File};
use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

use crate::client::{DEFAULT_TIMEOUT_SECS, SessionConfig};
use crate::signer::{DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER};

/// `$XDG_CONFIG_HOME`, or `$HOME/.config` when it is not set.
pub fn get_xdg_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

pub fn config_file_path(app_name: &str) -> Option<PathBuf> {
    get_xdg_config_path().map(|xdg_config| xdg_config.join(app_name).join("config.toml"))
}

/// Reads `config_path` into `T`, or `None` when the file does not exist.
pub fn load_config_file<T: DeserializeOwned>(config_path: &Path) -> anyhow::Result<Option<T>> {
    if !config_path.exists() {
        debug!("no config file at {}", config_path.display());
        return Ok(None);
    }

    let settings = Config::builder()
        .add_source(File::from(config_path.to_path_buf()).required(false))
        .build()?
        .try_deserialize()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to deserialize config file {}: {}",
                config_path.display(),
                e
            )
        })?;

    Ok(Some(settings))
}

/// Server connection values as they appear in a config file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerSettings {
    pub url: Option<String>,
    pub cookie: Option<String>,
    pub csrf_cookie: Option<String>,
    pub csrf_header: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server URL
    #[arg(long, env = "WEB50_URL", default_value = "")]
    pub url: String,

    /// Cookie string of a logged in browser session
    #[arg(long, env = "WEB50_COOKIE", default_value = "", hide_env_values = true)]
    pub cookie: String,

    /// Cookie holding the anti-forgery token
    #[arg(long, default_value = DEFAULT_CSRF_COOKIE)]
    pub csrf_cookie: String,

    /// Header carrying the anti-forgery token
    #[arg(long, default_value = DEFAULT_CSRF_HEADER)]
    pub csrf_header: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ServerArgs {
    /// Fills values the command line left at their defaults from the config
    /// file.
    pub fn merge(&mut self, settings: &ServerSettings) {
        // Using a macro to reduce repetition for string fields
        macro_rules! apply_if_default {
            ($args:expr, $field:ident, $config:expr, $default:expr) => {
                if let Some(value) = &$config.$field {
                    if $args.$field == $default {
                        $args.$field = value.clone();
                    }
                }
            };
        }

        apply_if_default!(self, url, settings, "");
        apply_if_default!(self, cookie, settings, "");
        apply_if_default!(self, csrf_cookie, settings, DEFAULT_CSRF_COOKIE);
        apply_if_default!(self, csrf_header, settings, DEFAULT_CSRF_HEADER);
        apply_if_default!(self, timeout_secs, settings, DEFAULT_TIMEOUT_SECS);
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            base_url: self.url.clone(),
            cookies: self.cookie.clone(),
            csrf_cookie: self.csrf_cookie.clone(),
            csrf_header: self.csrf_header.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
