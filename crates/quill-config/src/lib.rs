//! Quill configuration system
//!
//! Centralized settings for the style engine and the view tree, loaded from
//! `quill.toml` with environment variable overrides layered on top.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuillConfig {
    /// Style sheet and cascade settings
    pub style: StyleConfig,
    /// View layout settings
    pub layout: LayoutConfig,
    /// Comma separated diagnostic categories (`css`, `layout`, `all`)
    pub diagnostics: Option<String>,
}

/// Style sheet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Base font size in points; HTML size 3 maps to this value.
    pub base_font_size: f32,
    /// Maximum number of named rules a single sheet accepts.
    pub max_rules: usize,
    /// How deep `@import` chains are followed.
    pub max_import_depth: usize,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Advance of one character as a fraction of the font size.
    pub char_width: f32,
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
    /// Gap between a list marker and the list item content.
    pub bullet_gap: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            base_font_size: 12.0,
            max_rules: 10_000,
            max_import_depth: 4,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            char_width: 0.5,
            line_height: 1.2,
            bullet_gap: 5.0,
        }
    }
}

impl QuillConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `quill.toml` from the current directory, or defaults if it is
    /// missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from_file("quill.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables.
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Some(size) = env_parse::<f32>("QUILL_BASE_FONT_SIZE") {
            self.style.base_font_size = size;
        }
        if let Some(rules) = env_parse::<usize>("QUILL_MAX_RULES") {
            self.style.max_rules = rules;
        }
        if let Some(depth) = env_parse::<usize>("QUILL_MAX_IMPORT_DEPTH") {
            self.style.max_import_depth = depth;
        }
        if let Some(width) = env_parse::<f32>("QUILL_CHAR_WIDTH") {
            self.layout.char_width = width;
        }
        if let Some(height) = env_parse::<f32>("QUILL_LINE_HEIGHT") {
            self.layout.line_height = height;
        }
        if let Ok(diagnostics) = std::env::var("QUILL_DIAGNOSTICS") {
            self.diagnostics = Some(diagnostics);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from quill.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Whether diagnostics are enabled for `category`.
    pub fn diagnostics_enabled(&self, category: &str) -> bool {
        let Some(raw) = &self.diagnostics else {
            return false;
        };
        let set: HashSet<String> = raw
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        set.contains("all") || set.contains(&category.to_ascii_lowercase())
    }
}

/// Process-wide configuration, loaded on first use.
pub fn global() -> &'static QuillConfig {
    static CONFIG: OnceLock<QuillConfig> = OnceLock::new();
    CONFIG.get_or_init(QuillConfig::load)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuillConfig::default();
        assert_eq!(config.style.base_font_size, 12.0);
        assert_eq!(config.layout.bullet_gap, 5.0);
        assert!(config.diagnostics.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = QuillConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: QuillConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.style.max_rules, 10_000);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[style]\nbase_font_size = 16.0\n").unwrap();
        let config = QuillConfig::load_from_file(&path).unwrap();
        assert_eq!(config.style.base_font_size, 16.0);
        assert_eq!(config.style.max_import_depth, 4);
        assert_eq!(config.layout.line_height, 1.2);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[style\nbase_font_size = ").unwrap();
        assert!(matches!(
            QuillConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn diagnostics_categories() {
        let config = QuillConfig {
            diagnostics: Some("css, Layout".to_string()),
            ..Default::default()
        };
        assert!(config.diagnostics_enabled("css"));
        assert!(config.diagnostics_enabled("layout"));
        assert!(!config.diagnostics_enabled("writer"));

        let all = QuillConfig {
            diagnostics: Some("all".to_string()),
            ..Default::default()
        };
        assert!(all.diagnostics_enabled("writer"));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("QUILL_MAX_IMPORT_DEPTH", "2");
            std::env::set_var("QUILL_CHAR_WIDTH", "not-a-number");
        }

        let mut config = QuillConfig::default();
        config.merge_with_env();

        assert_eq!(config.style.max_import_depth, 2);
        assert_eq!(config.layout.char_width, 0.5);

        unsafe {
            std::env::remove_var("QUILL_MAX_IMPORT_DEPTH");
            std::env::remove_var("QUILL_CHAR_WIDTH");
        }
    }
}
