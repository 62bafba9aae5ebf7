//! Display preferences persisted between runs
//!
//! Flat JSON file in the user config directory. Independent of whatever data
//! is loaded; the copy sequence itself is never persisted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::validation::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    /// Row text size in points
    #[serde(default = "default_font_size")]
    pub font_size: u8,

    #[serde(default)]
    pub dark_mode: bool,

    /// Ctrl+Space triggers the advance action
    #[serde(default = "default_quick_advance")]
    pub quick_advance: bool,

    /// Panel opacity
    #[serde(default = "default_opacity_percent")]
    pub opacity_percent: u8,
}

fn default_font_size() -> u8 {
    14
}

fn default_quick_advance() -> bool {
    true
}

fn default_opacity_percent() -> u8 {
    100
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            dark_mode: false,
            quick_advance: default_quick_advance(),
            opacity_percent: default_opacity_percent(),
        }
    }
}

impl DisplayPreferences {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load preferences from the default location
    pub fn load() -> Self {
        let path = Self::path();
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "Failed to load preferences, using defaults");
                Self::default()
            }
        }
    }

    /// Load preferences from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Preferences file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences from {:?}", path))?;
        let mut prefs: DisplayPreferences = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences JSON from {:?}", path))?;
        prefs.validate_and_clamp();
        Ok(prefs)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize preferences to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences to {:?}", path))?;

        info!(path = %path.display(), "Saved preferences");
        Ok(())
    }

    /// Clamp values edited by hand into usable ranges
    pub fn validate_and_clamp(&mut self) {
        if self.font_size < MIN_FONT_SIZE {
            warn!(font_size = self.font_size, min = MIN_FONT_SIZE, "font_size below minimum, clamping");
            self.font_size = MIN_FONT_SIZE;
        } else if self.font_size > MAX_FONT_SIZE {
            warn!(font_size = self.font_size, max = MAX_FONT_SIZE, "font_size exceeds maximum, clamping");
            self.font_size = MAX_FONT_SIZE;
        }

        if self.opacity_percent < MIN_OPACITY_PERCENT {
            warn!(opacity_percent = self.opacity_percent, min = MIN_OPACITY_PERCENT, "opacity_percent below minimum, clamping");
            self.opacity_percent = MIN_OPACITY_PERCENT;
        } else if self.opacity_percent > MAX_OPACITY_PERCENT {
            warn!(opacity_percent = self.opacity_percent, max = MAX_OPACITY_PERCENT, "opacity_percent exceeds 100, clamping");
            self.opacity_percent = MAX_OPACITY_PERCENT;
        }
    }

    pub fn increase_font(&mut self) {
        if self.font_size < MAX_FONT_SIZE {
            self.font_size += 1;
        }
    }

    pub fn decrease_font(&mut self) {
        if self.font_size > MIN_FONT_SIZE {
            self.font_size -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = DisplayPreferences::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(prefs, DisplayPreferences::default());
        assert!(prefs.quick_advance);
        assert_eq!(prefs.font_size, 14);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = DisplayPreferences {
            font_size: 18,
            dark_mode: true,
            quick_advance: false,
            opacity_percent: 80,
        };
        prefs.save_to(&path).unwrap();
        assert_eq!(DisplayPreferences::load_from(&path).unwrap(), prefs);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"dark_mode": true}"#).unwrap();
        let prefs = DisplayPreferences::load_from(&path).unwrap();
        assert!(prefs.dark_mode);
        assert!(prefs.quick_advance);
        assert_eq!(prefs.opacity_percent, 100);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"font_size": 2, "opacity_percent": 250}"#).unwrap();
        let prefs = DisplayPreferences::load_from(&path).unwrap();
        assert_eq!(prefs.font_size, MIN_FONT_SIZE);
        assert_eq!(prefs.opacity_percent, MAX_OPACITY_PERCENT);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();
        assert!(DisplayPreferences::load_from(&path).is_err());
    }

    #[test]
    fn test_font_size_steps_stay_in_range() {
        let mut prefs = DisplayPreferences {
            font_size: MIN_FONT_SIZE,
            ..Default::default()
        };
        prefs.decrease_font();
        assert_eq!(prefs.font_size, MIN_FONT_SIZE);
        prefs.increase_font();
        assert_eq!(prefs.font_size, MIN_FONT_SIZE + 1);
    }
}
