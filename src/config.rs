//! Configuration support
//!
//! Loads settings from ~/.codehelper.toml (or %USERPROFILE%\.codehelper.toml on Windows)
//!
//! Keys are top-level TOML entries named the way the editor settings are:
//!
//! ```text
//! author = "Alice"
//! ColorHighLightEnable = true
//! ColorHighLightParam = { InvertTextColor = true, UseBorder = true }
//!
//! [[AutoHeadCommentParam]]
//! language = "rs"
//! comment = "// by ${author} on ${date}"
//!
//! [[CommentColorTag]]
//! tag = "TODO"
//! color = "#FF8C00"
//! bold = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::{Table, Value};
use tracing::warn;

use crate::error::Result;

pub const AUTHOR_KEY: &str = "author";
pub const HEAD_COMMENT_KEY: &str = "AutoHeadCommentParam";
pub const COLOR_HIGHLIGHT_KEY: &str = "ColorHighLightParam";
pub const COMMENT_TAG_KEY: &str = "CommentColorTag";
pub const COLOR_THEME_KEY: &str = "colorTheme";

/// Author substituted when none is configured
pub const DEFAULT_AUTHOR: &str = "CodeHelper";

/// Read access to the host's key-value configuration store
pub trait ConfigurationService {
    /// Look up a raw configuration value
    fn get(&self, key: &str) -> Option<&Value>;
}

/// Look up a configuration value and deserialize it
///
/// A value that does not fit `T` is logged and treated as absent.
pub fn get_typed<T: DeserializeOwned>(config: &dyn ConfigurationService, key: &str) -> Option<T> {
    let value = config.get(key)?.clone();
    match value.try_into() {
        Ok(typed) => Some(typed),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed configuration value");
            None
        }
    }
}

/// Look up a strictly boolean value
pub fn get_bool(config: &dyn ConfigurationService, key: &str) -> Option<bool> {
    config.get(key).and_then(Value::as_bool)
}

/// Configured author name, falling back to `DEFAULT_AUTHOR`
pub fn author(config: &dyn ConfigurationService) -> String {
    get_typed::<String>(config, AUTHOR_KEY)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

/// Header comment template for one file extension
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadCommentTemplate {
    /// File extension without the dot
    pub language: String,
    /// Comment text; may contain `${author}` and `${date}`
    pub comment: String,
}

/// Color literal highlighting options
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColorHighlightParams {
    pub invert_text_color: Option<bool>,
    pub use_border: Option<bool>,
    pub border_width: Option<String>,
    pub border_radius: Option<String>,
    pub border_style: Option<String>,
}

/// Styling for one comment tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentTagConfig {
    pub tag: String,
    pub color: String,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl CommentTagConfig {
    fn new(tag: &str, color: &str) -> Self {
        Self {
            tag: tag.to_string(),
            color: color.to_string(),
            strikethrough: false,
            underline: false,
            bold: false,
            italic: false,
        }
    }
}

/// Tags used when `CommentColorTag` is not configured
pub fn default_comment_tags() -> Vec<CommentTagConfig> {
    vec![
        CommentTagConfig::new("!", "#FF2D00"),
        CommentTagConfig::new("?", "#3498DB"),
        CommentTagConfig {
            strikethrough: true,
            ..CommentTagConfig::new("//", "#474747")
        },
        CommentTagConfig::new("todo", "#FF8C00"),
        CommentTagConfig::new("*", "#98C379"),
    ]
}

/// The set of keys touched by a configuration update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigChange {
    keys: Vec<String>,
}

impl ConfigChange {
    /// Create a change event for the given keys
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the change touches `key` or one of its sub-keys
    pub fn affects(&self, key: &str) -> bool {
        self.keys.iter().any(|changed| {
            changed == key
                || changed
                    .strip_prefix(key)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// The changed keys
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Configuration backed by a TOML table
#[derive(Debug, Clone, Default)]
pub struct TomlConfiguration {
    table: Table,
}

impl TomlConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".codehelper.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".codehelper.toml"))
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let table = contents.parse::<Table>()?;
        Ok(Self { table })
    }

    /// Load configuration from a file; a missing file yields an empty configuration
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::new()),
        }
    }

    /// Set a single key and report the change
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ConfigChange {
        self.table.insert(key.to_string(), value.into());
        ConfigChange::new([key])
    }

    /// Remove a key and report the change
    pub fn remove(&mut self, key: &str) -> ConfigChange {
        match self.table.remove(key) {
            Some(_) => ConfigChange::new([key]),
            None => ConfigChange::default(),
        }
    }

    /// Replace the whole table, reporting every key whose value differs
    pub fn replace(&mut self, table: Table) -> ConfigChange {
        let mut changed: Vec<String> = table
            .iter()
            .filter(|(key, value)| self.table.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        changed.extend(
            self.table
                .keys()
                .filter(|key| !table.contains_key(*key))
                .cloned(),
        );
        self.table = table;
        ConfigChange::new(changed)
    }
}

impl ConfigurationService for TomlConfiguration {
    fn get(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r##"
author = "Alice"
ColorHighLightEnable = false
ColorHighLightParam = { InvertTextColor = true, BorderWidth = "2px" }

[[AutoHeadCommentParam]]
language = "rs"
comment = "// ${author}"

[[CommentColorTag]]
tag = "TODO"
color = "#FF8C00"
bold = true
        "##;

        let config = TomlConfiguration::parse(contents).unwrap();
        assert_eq!(author(&config), "Alice");
        assert_eq!(get_bool(&config, "ColorHighLightEnable"), Some(false));

        let params: ColorHighlightParams = get_typed(&config, COLOR_HIGHLIGHT_KEY).unwrap();
        assert_eq!(params.invert_text_color, Some(true));
        assert_eq!(params.use_border, None);
        assert_eq!(params.border_width.as_deref(), Some("2px"));

        let templates: Vec<HeadCommentTemplate> = get_typed(&config, HEAD_COMMENT_KEY).unwrap();
        assert_eq!(templates[0].language, "rs");

        let tags: Vec<CommentTagConfig> = get_typed(&config, COMMENT_TAG_KEY).unwrap();
        assert_eq!(tags.len(), 1);
        assert!(tags[0].bold);
        assert!(!tags[0].italic);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(TomlConfiguration::parse("author = ").is_err());
    }

    #[test]
    fn test_malformed_value_is_absent() {
        let config = TomlConfiguration::parse("CommentColorTag = 3").unwrap();
        assert_eq!(get_typed::<Vec<CommentTagConfig>>(&config, COMMENT_TAG_KEY), None);
    }

    #[test]
    fn test_default_author() {
        let config = TomlConfiguration::new();
        assert_eq!(author(&config), DEFAULT_AUTHOR);
    }

    #[test]
    fn test_change_affects() {
        let change = ConfigChange::new(["ColorHighLightParam.UseBorder", "author"]);
        assert!(change.affects("ColorHighLightParam"));
        assert!(change.affects("author"));
        assert!(!change.affects("ColorHighLight"));
        assert!(!change.affects("CommentColorTag"));
    }

    #[test]
    fn test_replace_reports_differences() {
        let mut config = TomlConfiguration::parse("author = \"A\"\nkeep = 1\ngone = true").unwrap();
        let table = "author = \"B\"\nkeep = 1\nnew = 2".parse::<Table>().unwrap();
        let change = config.replace(table);

        assert!(change.affects("author"));
        assert!(change.affects("new"));
        assert!(change.affects("gone"));
        assert!(!change.affects("keep"));
        assert_eq!(author(&config), "B");
    }

    #[test]
    fn test_set_and_remove() {
        let mut config = TomlConfiguration::new();
        let change = config.set("CommentColorEnable", false);
        assert!(change.affects("CommentColorEnable"));
        assert_eq!(get_bool(&config, "CommentColorEnable"), Some(false));

        assert!(config.remove("CommentColorEnable").affects("CommentColorEnable"));
        assert!(config.remove("CommentColorEnable").is_empty());
    }
}
