use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_typing_idle_ms")]
    pub typing_idle_ms: u64,
    #[serde(default = "default_version_advance_ms")]
    pub version_advance_ms: u64,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: Option<String>,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default)]
    pub lessons_path: Option<String>,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_typing_idle_ms() -> u64 {
    300
}
fn default_version_advance_ms() -> u64 {
    200
}
fn default_shuffle() -> bool {
    true
}
fn default_speech_command() -> Option<String> {
    if cfg!(target_os = "macos") {
        Some("say".to_string())
    } else if cfg!(target_os = "linux") {
        Some("espeak".to_string())
    } else {
        None
    }
}
fn default_speech_rate() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            typing_idle_ms: default_typing_idle_ms(),
            version_advance_ms: default_version_advance_ms(),
            shuffle: default_shuffle(),
            speech_command: default_speech_command(),
            speech_rate: default_speech_rate(),
            lessons_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reword")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms)
    }

    pub fn version_advance(&self) -> Duration {
        Duration::from_millis(self.version_advance_ms)
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        if self.typing_idle_ms == 0 {
            self.typing_idle_ms = default_typing_idle_ms();
        }
        if !(0.25..=4.0).contains(&self.speech_rate) {
            self.speech_rate = default_speech_rate();
        }
        if self
            .speech_command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            self.speech_command = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.typing_idle_ms, 300);
        assert_eq!(config.version_advance_ms, 200);
        assert!(config.shuffle);
        assert_eq!(config.lessons_path, None);
        assert_eq!(config.typing_idle(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "terminal-default"
shuffle = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert!(!config.shuffle);
        assert_eq!(config.speech_rate, 1.0);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            lessons_path: Some("/tmp/lessons.txt".into()),
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_normalize_resets_out_of_range_values() {
        let mut config = Config {
            typing_idle_ms: 0,
            speech_rate: 9.0,
            speech_command: Some("  ".into()),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.typing_idle_ms, 300);
        assert_eq!(config.speech_rate, 1.0);
        assert_eq!(config.speech_command, None);
    }
}
