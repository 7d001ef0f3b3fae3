//! Runtime settings.
//!
//! Defaults can be overridden from the environment:
//! `PAPERCUT_SEED` (u64), `PAPERCUT_FONT_SIZE` (`small`/`large`) and
//! `PAPERCUT_BACKDROP` (`plain`/`paper`/`ink`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::FontSize;
use crate::ui::backdrop::Backdrop;

pub const ENV_SEED: &str = "PAPERCUT_SEED";
pub const ENV_FONT_SIZE: &str = "PAPERCUT_FONT_SIZE";
pub const ENV_BACKDROP: &str = "PAPERCUT_BACKDROP";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var}: {value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session seed; random per run when unset
    pub seed: Option<u64>,
    pub font_size: FontSize,
    pub backdrop: Backdrop,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or empty keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_SEED) {
            settings.seed = Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: ENV_SEED,
                value: value.clone(),
                expected: "unsigned 64-bit integer",
            })?);
        }
        if let Some(value) = get(ENV_FONT_SIZE) {
            settings.font_size = value.parse().map_err(|_| ConfigError::Invalid {
                var: ENV_FONT_SIZE,
                value: value.clone(),
                expected: "font size (small or large)",
            })?;
        }
        if let Some(value) = get(ENV_BACKDROP) {
            settings.backdrop = value.parse().map_err(|_| ConfigError::Invalid {
                var: ENV_BACKDROP,
                value: value.clone(),
                expected: "backdrop (plain, paper or ink)",
            })?;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.backdrop, Backdrop::Plain);
        assert_eq!(settings.font_size, FontSize::Small);
    }

    #[test]
    fn test_reads_all_keys() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_SEED, "42"),
            (ENV_FONT_SIZE, "large"),
            (ENV_BACKDROP, "ink"),
        ]))
        .unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.font_size, FontSize::Large);
        assert_eq!(settings.backdrop, Backdrop::Ink);
    }

    #[test]
    fn test_invalid_value_names_variable() {
        let err = Settings::from_lookup(lookup(&[(ENV_SEED, "-1")])).unwrap_err();
        assert!(err.to_string().starts_with(ENV_SEED));
    }

    #[test]
    fn test_deserializes_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"backdrop":"paper"}"#).unwrap();
        assert_eq!(settings.backdrop, Backdrop::Paper);
        assert_eq!(settings.seed, None);
    }
}
