//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Backend base URL
    pub api_base_url: Option<String>,
    /// Lesson sort field
    pub lesson_sort_field: Option<String>,
    /// Lesson sort direction
    pub lesson_sort_direction: Option<String>,
    /// Show past lessons by default
    pub show_past_lessons: Option<bool>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "lingua", "lingua-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.api_base_url.is_none());
        assert!(config.lesson_sort_field.is_none());
        assert!(config.lesson_sort_direction.is_none());
        assert!(config.show_past_lessons.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = AppConfig {
            api_base_url: Some("http://localhost:8080/api/v1".to_string()),
            lesson_sort_field: Some("starts_at".to_string()),
            lesson_sort_direction: Some("desc".to_string()),
            show_past_lessons: Some(true),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.api_base_url,
            Some("http://localhost:8080/api/v1".to_string())
        );
        assert_eq!(parsed.lesson_sort_field, Some("starts_at".to_string()));
        assert_eq!(parsed.lesson_sort_direction, Some("desc".to_string()));
        assert_eq!(parsed.show_past_lessons, Some(true));
    }

    #[test]
    fn test_partial_serialization() {
        let config = AppConfig {
            lesson_sort_field: Some("status".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.lesson_sort_field, Some("status".to_string()));
        assert!(parsed.api_base_url.is_none());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let json = "{}";
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.api_base_url.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"api_base_url": "http://x", "unknown_field": "value"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.api_base_url, Some("http://x".to_string()));
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let result = AppConfig::load();
        assert!(result.is_ok());
    }
}
