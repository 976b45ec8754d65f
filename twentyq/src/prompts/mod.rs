//! Prompt templates for the model-backed roles.
//!
//! Default text lives in `twentyq/prompts/game.yaml` and is embedded at compile time.
//! A directory given explicitly or through `TWENTYQ_PROMPTS_DIR` must contain a
//! `game.yaml`, which replaces it wholesale. Templates use `{name}` placeholders, filled by
//! [`render`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

const EMBED_GAME: &str = include_str!("../../prompts/game.yaml");

const GAME_FILE: &str = "game.yaml";

/// Env var naming a directory with a `game.yaml` override.
pub const PROMPTS_DIR_ENV: &str = "TWENTYQ_PROMPTS_DIR";

/// Error when loading prompts from a directory.
#[derive(Debug, thiserror::Error)]
pub enum PromptLoadError {
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionerPrompts {
    pub system: String,
    pub ask: String,
    pub guess_system: String,
    pub guess: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RolePrompts {
    pub system: String,
    pub user: String,
}

/// All prompt templates for one game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GamePrompts {
    pub questioner: QuestionerPrompts,
    pub answerer: RolePrompts,
    pub judge: RolePrompts,
}

impl GamePrompts {
    /// Embedded defaults.
    pub fn embedded() -> Result<Self, PromptLoadError> {
        parse(EMBED_GAME, "<embedded game.yaml>")
    }

    /// Loads `game.yaml` from `dir` (or `TWENTYQ_PROMPTS_DIR`); the embedded defaults are
    /// used only when no directory is configured. A configured directory without the file
    /// is a [`PromptLoadError::ReadFile`].
    pub fn load(dir: Option<&Path>) -> Result<Self, PromptLoadError> {
        let dir: Option<PathBuf> = dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(PROMPTS_DIR_ENV).ok().map(PathBuf::from));
        let path = match dir {
            Some(d) => d.join(GAME_FILE),
            None => return Self::embedded(),
        };
        let content = std::fs::read_to_string(&path).map_err(|e| PromptLoadError::ReadFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Loaded prompts override");
        parse(&content, &path.display().to_string())
    }
}

fn parse(content: &str, path: &str) -> Result<GamePrompts, PromptLoadError> {
    serde_yaml::from_str(content).map_err(|e| PromptLoadError::ParseYaml {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Replaces every `{key}` in `template` with its value in one pass over the template.
/// Unknown placeholders stay as-is; substituted values are never scanned again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
