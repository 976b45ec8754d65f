//! Load configuration from XDG `config.toml` and project `.env`, apply it to the process
//! environment with priority **existing env > .env > XDG**, then resolve typed game settings.
//!
//! The XDG file has two tables: `[env]` (plain key/value pairs exported like `.env`) and
//! `[game]` (typed defaults for a run, see [`GameFileConfig`]).

mod dotenv;
mod xdg_toml;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use xdg_toml::{config_path, GameFileConfig};

pub const APP_NAME: &str = "twentyq";

pub const DEFAULT_MAX_ROUNDS: u32 = 20;
pub const DEFAULT_QUESTIONER_MODEL: &str = "gpt-4.1";
pub const DEFAULT_ANSWERER_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4-turbo";

pub const ENV_MAX_ROUNDS: &str = "TWENTYQ_MAX_ROUNDS";
pub const ENV_SEED: &str = "TWENTYQ_SEED";
pub const ENV_QUESTIONER_MODEL: &str = "TWENTYQ_QUESTIONER_MODEL";
pub const ENV_ANSWERER_MODEL: &str = "TWENTYQ_ANSWERER_MODEL";
pub const ENV_JUDGE_MODEL: &str = "TWENTYQ_JUDGE_MODEL";
pub const ENV_PROMPTS_DIR: &str = "TWENTYQ_PROMPTS_DIR";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Loads XDG `config.toml` and optional project `.env`, sets environment variables only for
/// keys that are **not** already set, and returns the file's `[game]` table.
///
/// Order of precedence when a key is missing in the process environment:
/// 1. Value from project `.env` (current directory or `override_dir` if given)
/// 2. Value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<GameFileConfig, LoadError> {
    let file = xdg_toml::load(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir)?;

    let mut keys: std::collections::HashSet<&String> = file.env.keys().collect();
    keys.extend(dotenv_map.keys());

    let mut applied = 0usize;
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = dotenv_map.get(key).or_else(|| file.env.get(key)) {
            std::env::set_var(key, v);
            applied += 1;
        }
    }
    tracing::debug!(app = app_name, applied, "Applied config to environment");

    Ok(file.game)
}

/// Settings for one game after merging env and the `[game]` table over built-in defaults.
/// CLI flags are layered on top by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub max_rounds: u32,
    /// `None` means the built-in catalogue.
    pub catalogue: Option<Vec<String>>,
    /// `None` means an entropy-seeded pick.
    pub seed: Option<u64>,
    pub questioner_model: String,
    pub answerer_model: String,
    pub judge_model: String,
    pub temperature: Option<f32>,
    pub prompts_dir: Option<PathBuf>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            catalogue: None,
            seed: None,
            questioner_model: DEFAULT_QUESTIONER_MODEL.to_string(),
            answerer_model: DEFAULT_ANSWERER_MODEL.to_string(),
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            temperature: None,
            prompts_dir: None,
        }
    }
}

impl GameSettings {
    /// Resolves from the process environment and `file`: env > file > defaults.
    pub fn resolve(file: &GameFileConfig) -> Result<Self, LoadError> {
        Self::resolve_with(file, |key| std::env::var(key).ok())
    }

    /// Same as [`GameSettings::resolve`] with an explicit env lookup. Blank values count as unset.
    pub fn resolve_with<F>(file: &GameFileConfig, lookup: F) -> Result<Self, LoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let max_rounds = match env(ENV_MAX_ROUNDS) {
            Some(v) => parse_value(ENV_MAX_ROUNDS, &v)?,
            None => file.max_rounds.unwrap_or(defaults.max_rounds),
        };
        let seed = match env(ENV_SEED) {
            Some(v) => Some(parse_value(ENV_SEED, &v)?),
            None => file.seed,
        };
        let model = |key: &str, from_file: &Option<String>, fallback: String| {
            env(key).or_else(|| from_file.clone()).unwrap_or(fallback)
        };

        Ok(Self {
            max_rounds,
            catalogue: file.catalogue.clone(),
            seed,
            questioner_model: model(
                ENV_QUESTIONER_MODEL,
                &file.questioner_model,
                defaults.questioner_model,
            ),
            answerer_model: model(
                ENV_ANSWERER_MODEL,
                &file.answerer_model,
                defaults.answerer_model,
            ),
            judge_model: model(ENV_JUDGE_MODEL, &file.judge_model, defaults.judge_model),
            temperature: file.temperature,
            prompts_dir: env(ENV_PROMPTS_DIR)
                .map(PathBuf::from)
                .or_else(|| file.prompts_dir.clone()),
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::sync::Mutex;

    /// Serializes tests that touch `XDG_CONFIG_HOME` or other process env.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn restore_var(key: &str, prev: Option<String>) {
        match prev {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    fn write_xdg(body: &str) -> tempfile::TempDir {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join(APP_NAME);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
        xdg_dir
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn existing_env_wins() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "CONFIG_TEST_EXISTING=from_dotenv\n").unwrap();
        env::set_var("CONFIG_TEST_EXISTING", "from_env");
        let _ = load_and_apply("config-crate-nonexistent-app-xyz", Some(dir.path()));
        assert_eq!(env::var("CONFIG_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("CONFIG_TEST_EXISTING");
    }

    #[test]
    fn no_config_yields_empty_game_table() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let empty = tempfile::tempdir().unwrap();
        let r = load_and_apply("config-crate-nonexistent-app-xyz", Some(empty.path()));
        assert_eq!(r.unwrap(), GameFileConfig::default());
    }

    #[test]
    fn dotenv_overrides_xdg_and_game_table_is_returned() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg(
            "[env]\nCONFIG_TEST_PRIORITY = \"from_xdg\"\n\n[game]\nmax_rounds = 6\n",
        );
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "CONFIG_TEST_PRIORITY=from_dotenv\n",
        )
        .unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("CONFIG_TEST_PRIORITY");

        let game = load_and_apply(APP_NAME, Some(dotenv_dir.path()));
        let val = env::var("CONFIG_TEST_PRIORITY").unwrap();
        env::remove_var("CONFIG_TEST_PRIORITY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val, "from_dotenv");
        assert_eq!(game.unwrap().max_rounds, Some(6));
    }

    #[test]
    fn xdg_applied_when_no_dotenv() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg("[env]\nCONFIG_TEST_XDG_ONLY = \"from_xdg\"\n");
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("CONFIG_TEST_XDG_ONLY");

        let _ = load_and_apply(APP_NAME, Some(empty_dir.path()));
        let val = env::var("CONFIG_TEST_XDG_ONLY").unwrap();
        env::remove_var("CONFIG_TEST_XDG_ONLY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val, "from_xdg");
    }

    #[test]
    fn invalid_xdg_toml_fails_with_xdg_parse_error() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg("invalid [[[\n");
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());

        let result = load_and_apply(APP_NAME, Some(empty_dir.path()));
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    #[test]
    fn settings_default_without_env_or_file() {
        let s = GameSettings::resolve_with(&GameFileConfig::default(), lookup(&[])).unwrap();
        assert_eq!(s, GameSettings::default());
        assert_eq!(s.max_rounds, 20);
        assert_eq!(s.questioner_model, "gpt-4.1");
        assert_eq!(s.answerer_model, "gpt-4-turbo");
        assert_eq!(s.judge_model, "gpt-4-turbo");
    }

    #[test]
    fn env_overrides_file_which_overrides_defaults() {
        let file = GameFileConfig {
            max_rounds: Some(8),
            seed: Some(1),
            judge_model: Some("file-judge".into()),
            answerer_model: Some("file-answerer".into()),
            catalogue: Some(vec!["lamp".into()]),
            ..Default::default()
        };
        let s = GameSettings::resolve_with(
            &file,
            lookup(&[
                (ENV_MAX_ROUNDS, "3"),
                (ENV_JUDGE_MODEL, "env-judge"),
                (ENV_ANSWERER_MODEL, "  "),
                (ENV_PROMPTS_DIR, "/tmp/prompts"),
            ]),
        )
        .unwrap();
        assert_eq!(s.max_rounds, 3);
        assert_eq!(s.seed, Some(1));
        assert_eq!(s.judge_model, "env-judge");
        assert_eq!(s.answerer_model, "file-answerer");
        assert_eq!(s.questioner_model, DEFAULT_QUESTIONER_MODEL);
        assert_eq!(s.catalogue, Some(vec!["lamp".to_string()]));
        assert_eq!(s.prompts_dir, Some(PathBuf::from("/tmp/prompts")));
    }

    #[test]
    fn unparsable_env_number_is_invalid_value() {
        let err = GameSettings::resolve_with(
            &GameFileConfig::default(),
            lookup(&[(ENV_SEED, "forty-two")]),
        )
        .unwrap_err();
        match err {
            LoadError::InvalidValue { key, value } => {
                assert_eq!(key, ENV_SEED);
                assert_eq!(value, "forty-two");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}
