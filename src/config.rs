use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizSettings;

const APP_DIR: &str = "assignment_quiz";
const CONFIG_FILE: &str = "userconfig.cfg";
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Question bank to load at startup. The bundled sample bank is used when unset.
    pub bank_path: Option<PathBuf>,
    pub deduplicate_all: bool,
    /// Delay before moving on after an answer; `None` disables auto-advance.
    pub auto_advance_delay_ms: Option<u64>,
    pub shuffle_options: bool,
    pub file_history: Vec<(String, i64)>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            bank_path: None,
            deduplicate_all: true,
            auto_advance_delay_ms: None,
            shuffle_options: false,
            file_history: Vec::new(),
        }
    }
}

/// Directory holding the config and log files, falling back to the working directory.
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl UserConfig {
    pub fn path() -> PathBuf {
        app_dir().join(CONFIG_FILE)
    }

    pub fn load() -> Self {
        let config_path = Self::path();
        match fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) => {
                debug!("No config at {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|e| {
            warn!("Ignoring unreadable config: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;
        debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    pub fn update_file_history(&mut self, filename: String) {
        let timestamp = chrono::Utc::now().timestamp();
        self.file_history.retain(|(f, _)| f != &filename);
        self.file_history.insert(0, (filename, timestamp));
        self.file_history.truncate(HISTORY_LIMIT);
    }

    pub fn quiz_settings(&self) -> QuizSettings {
        QuizSettings {
            deduplicate_all: self.deduplicate_all,
            auto_advance: self.auto_advance_delay_ms.map(Duration::from_millis),
            shuffle_options: self.shuffle_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = UserConfig::from_json(r#"{"auto_advance_delay_ms": 2000}"#);
        assert_eq!(config.auto_advance_delay_ms, Some(2000));
        assert!(config.deduplicate_all);
        assert!(config.bank_path.is_none());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        assert_eq!(UserConfig::from_json("not json"), UserConfig::default());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = UserConfig::default();
        config.bank_path = Some(PathBuf::from("banks/course.csv"));
        config.shuffle_options = true;
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(UserConfig::from_json(&json), config);
    }

    #[test]
    fn history_is_most_recent_first_and_capped() {
        let mut config = UserConfig::default();
        for i in 0..12 {
            config.update_file_history(format!("bank{}.json", i));
        }
        config.update_file_history("bank5.json".to_string());

        assert_eq!(config.file_history.len(), HISTORY_LIMIT);
        assert_eq!(config.file_history[0].0, "bank5.json");
        assert_eq!(
            config
                .file_history
                .iter()
                .filter(|(f, _)| f == "bank5.json")
                .count(),
            1
        );
    }

    #[test]
    fn settings_follow_config() {
        let config = UserConfig {
            deduplicate_all: false,
            auto_advance_delay_ms: Some(1500),
            ..UserConfig::default()
        };
        let settings = config.quiz_settings();
        assert!(!settings.deduplicate_all);
        assert_eq!(settings.auto_advance, Some(Duration::from_millis(1500)));
    }
}
