//! Read `$XDG_CONFIG_HOME/<app>/config.toml`: the `[env]` table and the `[game]` table.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LoadError;

/// `$XDG_CONFIG_HOME`, else `~/.config`.
fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .ok_or_else(|| LoadError::XdgPath("home directory not found".into()))
}

/// Path of the app's `config.toml`, whether or not it exists.
pub fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    Ok(config_home()?.join(app_name).join("config.toml"))
}

/// `[game]` table. Every key is optional; missing keys fall back to env or defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameFileConfig {
    pub max_rounds: Option<u32>,
    pub catalogue: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub questioner_model: Option<String>,
    pub answerer_model: Option<String>,
    pub judge_model: Option<String>,
    pub temperature: Option<f32>,
    pub prompts_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub game: GameFileConfig,
}

/// Parses the app's config file. A missing file yields empty tables.
pub(crate) fn load(app_name: &str) -> Result<ConfigFile, LoadError> {
    let path = config_path(app_name)?;
    if !path.is_file() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let file: ConfigFile = toml::from_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        env_keys = file.env.len(),
        "Loaded XDG config"
    );
    Ok(file)
}
