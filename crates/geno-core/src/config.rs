//! Editor settings.
//!
//! Hosts usually keep these in a TOML file next to their other settings:
//!
//! ```toml
//! tab_width = 4
//! tab_key_behavior = "spaces"
//! auto_indent = true
//! search_workers = 8
//! ```

use serde::Deserialize;

/// Controls what the Tab key inserts when no multi-line selection is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKeyBehavior {
    /// Insert a literal `'\t'`.
    #[default]
    Tab,
    /// Insert spaces up to the next tab stop.
    Spaces,
}

/// Settings shared by every document of an editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of a tab stop in display cells.
    pub tab_width: usize,
    /// What the Tab key inserts.
    pub tab_key_behavior: TabKeyBehavior,
    /// Copy the leading whitespace of the current line on Enter.
    pub auto_indent: bool,
    /// Number of line chunks a search is split into (one worker thread each).
    pub search_workers: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            tab_key_behavior: TabKeyBehavior::Tab,
            auto_indent: true,
            search_workers: 4,
        }
    }
}

/// Errors produced while loading an [`EditorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid editor config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is out of range.
    #[error("invalid editor config: {field} must be greater than zero")]
    Zero {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl EditorConfig {
    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if config.tab_width == 0 {
            return Err(ConfigError::Zero { field: "tab_width" });
        }
        if config.search_workers == 0 {
            return Err(ConfigError::Zero {
                field: "search_workers",
            });
        }
        Ok(config)
    }

    /// The text a Tab key press inserts at display column `column`.
    pub fn indent_unit(&self, column: usize) -> String {
        match self.tab_key_behavior {
            TabKeyBehavior::Tab => "\t".to_string(),
            TabKeyBehavior::Spaces => {
                let width = self.tab_width.max(1);
                " ".repeat(width - column % width)
            }
        }
    }
}
