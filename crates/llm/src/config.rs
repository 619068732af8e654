//! Completion-service configuration.
//!
//! Settings file: `~/.config/tabqa/settings.toml`. API keys are never
//! written there by the CLI; they resolve flag > environment >
//! settings file. A second, optional key lets the rewrite stage run on
//! separate rate limits from codegen.

use std::env;
use std::fs;
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TABQA_API_KEY";

/// Optional second key used only for the rewrite call.
pub const REWRITE_API_KEY_ENV: &str = "TABQA_REWRITE_API_KEY";

/// On-disk settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_base: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Settings file location (`~/.config/tabqa/settings.toml`).
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabqa")
        .join("settings.toml")
}

/// Load settings; a missing or unreadable file yields defaults.
pub fn load_settings() -> LlmSettings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &PathBuf) -> LlmSettings {
    match fs::read_to_string(path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring malformed settings file {}: {}", path.display(), e);
                LlmSettings::default()
            }
        },
        Err(_) => LlmSettings::default(),
    }
}

/// Fully-resolved configuration ready to build a client from.
#[derive(Debug, Clone)]
pub struct ResolvedLlmConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Merge flags over environment over the settings file.
pub fn resolve(
    flag_api_key: Option<String>,
    flag_model: Option<String>,
    flag_api_base: Option<String>,
) -> ResolvedLlmConfig {
    let settings = load_settings();

    let api_key = flag_api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| api_key_from_env(API_KEY_ENV))
        .or(settings.api_key);

    ResolvedLlmConfig {
        api_base: flag_api_base.unwrap_or(settings.api_base),
        model: flag_model.unwrap_or(settings.model),
        api_key,
    }
}

/// The optional rewrite-stage key, environment only.
pub fn rewrite_api_key() -> Option<String> {
    api_key_from_env(REWRITE_API_KEY_ENV)
}

fn api_key_from_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = LlmSettings::default();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "api_base = \"http://localhost:8080\"").unwrap();
        writeln!(file, "model = \"command-r-plus\"").unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.api_base, "http://localhost:8080");
        assert_eq!(settings.model, "command-r-plus");
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "api_base = [not toml").unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_flag_key_wins_and_blank_flag_ignored() {
        let resolved = resolve(Some("sk-flag".into()), None, None);
        assert_eq!(resolved.api_key.as_deref(), Some("sk-flag"));

        // A blank flag does not mask other sources with an empty key.
        let resolved = resolve(Some("   ".into()), None, None);
        assert_ne!(resolved.api_key.as_deref(), Some("   "));
    }

    #[test]
    fn test_flag_overrides_model_and_base() {
        let resolved = resolve(None, Some("m2".into()), Some("http://mock".into()));
        assert_eq!(resolved.model, "m2");
        assert_eq!(resolved.api_base, "http://mock");
    }
}
