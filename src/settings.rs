use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::toggl::BASE_URL;

const APP_NAME: &str = "toggler";
const ENV_PREFIX: &str = "TOGGLER";

/// Resolved once at startup and passed down to the commands.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: None,
            api_url: default_api_url(),
        }
    }
}

impl Settings {
    /// Reads `toggler.yaml` from the user config dir and the working
    /// directory (or only `explicit` when given), then `TOGGLER_*` env vars.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(&config_files(explicit), Environment::with_prefix(ENV_PREFIX))
    }

    fn from_sources(files: &[(PathBuf, bool)], env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        for (path, required) in files {
            log::debug!("Reading configuration at path {path:?} (required: {required})");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Yaml)
                    .required(*required),
            );
        }
        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        log::trace!("Config: api_url is {}", settings.api_url);
        Ok(settings)
    }

    /// A blank token counts as missing.
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

fn config_files(explicit: Option<&Path>) -> Vec<(PathBuf, bool)> {
    if let Some(path) = explicit {
        return vec![(path.to_path_buf(), true)];
    }

    let file_name = format!("{APP_NAME}.yaml");
    let mut files = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        files.push((dir.join(APP_NAME).join(&file_name), false));
    }
    files.push((PathBuf::from(file_name), false));
    files
}

fn default_api_url() -> String {
    BASE_URL.to_string()
}
