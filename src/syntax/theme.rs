//! Theme registry
//!
//! Contributed theme files are TOML with a `[colors]` table keyed by
//! workbench color names:
//!
//! ```text
//! name = "Solarized Dark"
//! type = "dark"
//!
//! [colors]
//! "editor.background" = "#002b36"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use super::contributions::Contributions;
use crate::error::Result;

const EDITOR_BACKGROUND: &str = "editor.background";

/// A parsed theme file
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ThemeConfiguration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl ThemeConfiguration {
    /// Parse a theme from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Theme id -> theme file, parsed lazily and cached
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    theme_files: HashMap<String, PathBuf>,
    themes: HashMap<String, Option<ThemeConfiguration>>,
}

impl ThemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every theme
    pub fn clear(&mut self) {
        self.theme_files.clear();
        self.themes.clear();
    }

    /// Replace known themes with a fresh discovery result
    pub fn update_definitions(&mut self, contributions: &Contributions) {
        self.clear();
        for theme in &contributions.themes {
            self.theme_files.insert(theme.id.clone(), theme.path.clone());
        }
    }

    /// Get a theme, parsing its file on first use
    ///
    /// Unreadable or malformed files are cached as absent.
    pub fn theme(&mut self, theme_id: &str) -> Option<&ThemeConfiguration> {
        if !self.themes.contains_key(theme_id) {
            let path = self.theme_files.get(theme_id)?;
            let loaded = match load_theme(path) {
                Ok(theme) => Some(theme),
                Err(e) => {
                    warn!(theme = theme_id, error = %e, "unreadable theme");
                    None
                }
            };
            self.themes.insert(theme_id.to_string(), loaded);
        }
        self.themes.get(theme_id)?.as_ref()
    }

    /// The `editor.background` color of a theme
    pub fn editor_background(&mut self, theme_id: &str) -> Option<String> {
        self.theme(theme_id)?.colors.get(EDITOR_BACKGROUND).cloned()
    }
}

fn load_theme(path: &Path) -> Result<ThemeConfiguration> {
    let contents = fs::read_to_string(path)?;
    ThemeConfiguration::parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ThemeContribution;

    fn registry_with(id: &str, file: &str, contents: Option<&str>) -> (ThemeRegistry, PathBuf) {
        let path = std::env::temp_dir().join(format!("codehelper-{}-{}", std::process::id(), file));
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        let mut registry = ThemeRegistry::new();
        registry.update_definitions(&Contributions {
            languages: Vec::new(),
            themes: vec![ThemeContribution {
                id: id.to_string(),
                path: path.clone(),
            }],
        });
        (registry, path)
    }

    #[test]
    fn test_editor_background() {
        let (mut registry, path) = registry_with(
            "Dark",
            "dark-theme.toml",
            Some("name = \"Dark\"\ntype = \"dark\"\n[colors]\n\"editor.background\" = \"#1e1e1e\"\n"),
        );
        assert_eq!(registry.editor_background("Dark").as_deref(), Some("#1e1e1e"));
        assert_eq!(registry.theme("Dark").and_then(|t| t.kind.clone()).as_deref(), Some("dark"));
        assert_eq!(registry.editor_background("Light"), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_cached_as_absent() {
        let (mut registry, path) = registry_with("Ghost", "ghost-theme.toml", None);
        let _ = fs::remove_file(&path);
        assert_eq!(registry.editor_background("Ghost"), None);

        fs::write(&path, "[colors]\n\"editor.background\" = \"#ffffff\"\n").unwrap();
        assert_eq!(registry.editor_background("Ghost"), None);
        let _ = fs::remove_file(&path);
    }
}
