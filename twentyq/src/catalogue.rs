//! Secret catalogue: the small set of objects a game's secret is drawn from.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::GameError;

/// Objects used when no catalogue is configured.
pub const DEFAULT_SECRETS: [&str; 10] = [
    "bird",
    "chair",
    "refrigerator",
    "ball",
    "table",
    "computer",
    "book",
    "phone",
    "car",
    "tree",
];

/// Non-empty, de-duplicated list of candidate secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretCatalogue {
    items: Vec<String>,
}

impl SecretCatalogue {
    /// Builds a catalogue; blank entries are dropped, duplicates keep their first position.
    pub fn new<I, T>(items: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.into().trim().to_string();
            if !item.is_empty() && !out.contains(&item) {
                out.push(item);
            }
        }
        if out.is_empty() {
            return Err(GameError::InvalidConfig("secret catalogue is empty".into()));
        }
        Ok(Self { items: out })
    }

    /// Parses a comma-separated list, e.g. `"ball, chair,tree"`.
    pub fn parse(list: &str) -> Result<Self, GameError> {
        Self::new(list.split(','))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Uniform pick. The same seed always yields the same secret; `None` draws from entropy.
    pub fn pick(&self, seed: Option<u64>) -> &str {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self.items
            .choose(&mut rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SECRETS[0])
    }
}

impl Default for SecretCatalogue {
    fn default() -> Self {
        Self {
            items: DEFAULT_SECRETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
