//! Language registry
//!
//! Maps language ids to their comment syntax. Contributed configuration
//! files are parsed lazily on first lookup and the result (including a
//! failure) is cached until the registry is cleared.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::builtin;
use super::contributions::Contributions;
use super::language::LanguageConfiguration;
use super::LanguageProvider;
use crate::error::Result;

/// Language metadata from extensions and the built-in table
pub struct LanguageRegistry {
    /// Language id -> contributed configuration file
    configuration_files: HashMap<String, PathBuf>,
    /// Language id -> parsed contributed configuration (None = unreadable)
    configurations: HashMap<String, Option<LanguageConfiguration>>,
    /// Built-in configurations, used when nothing is contributed
    builtin: HashMap<String, LanguageConfiguration>,
    /// Extension to language id mapping
    extension_map: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create a registry with the built-in languages
    pub fn new() -> Self {
        let mut registry = Self {
            configuration_files: HashMap::new(),
            configurations: HashMap::new(),
            builtin: HashMap::new(),
            extension_map: HashMap::new(),
        };

        for lang in builtin::all_languages() {
            registry.builtin.insert(
                lang.id.to_string(),
                LanguageConfiguration::with_line_comments(lang.line_comments),
            );
        }
        registry.reset_extension_map();

        registry
    }

    fn reset_extension_map(&mut self) {
        self.extension_map.clear();
        for lang in builtin::all_languages() {
            for ext in lang.extensions {
                self.extension_map.insert(ext.to_string(), lang.id.to_string());
            }
        }
    }

    /// Forget every contributed definition and cached configuration
    pub fn clear(&mut self) {
        self.configuration_files.clear();
        self.configurations.clear();
        self.reset_extension_map();
    }

    /// Replace contributed definitions with a fresh discovery result
    pub fn update_definitions(&mut self, contributions: &Contributions) {
        self.clear();
        for language in &contributions.languages {
            if let Some(path) = &language.configuration {
                self.add_configuration_file(&language.id, path.clone());
            }
            for ext in &language.extensions {
                self.extension_map.insert(ext.clone(), language.id.clone());
            }
        }
        debug!(
            languages = self.configuration_files.len(),
            "language definitions updated"
        );
    }

    /// Register a single contributed configuration file
    pub fn add_configuration_file(&mut self, language_id: &str, path: PathBuf) {
        self.configurations.remove(language_id);
        self.configuration_files.insert(language_id.to_string(), path);
    }

    /// Detect language id from filename
    pub fn detect_language(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&ext).map(|s| s.as_str())
    }

    /// Get the configuration for a language
    ///
    /// A contributed file wins over the built-in entry. A contributed file
    /// that cannot be read or parsed is cached as absent and not retried.
    pub fn configuration(&mut self, language_id: &str) -> Option<&LanguageConfiguration> {
        if !self.configurations.contains_key(language_id) {
            if let Some(path) = self.configuration_files.get(language_id) {
                let loaded = match load_configuration(path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        warn!(
                            language = language_id,
                            path = %path.display(),
                            error = %e,
                            "unreadable language configuration"
                        );
                        None
                    }
                };
                self.configurations.insert(language_id.to_string(), loaded);
            }
        }

        match self.configurations.get(language_id) {
            Some(cached) => cached.as_ref(),
            None => self.builtin.get(language_id),
        }
    }
}

fn load_configuration(path: &Path) -> Result<LanguageConfiguration> {
    let contents = fs::read_to_string(path)?;
    LanguageConfiguration::parse(&contents)
}

impl LanguageProvider for LanguageRegistry {
    fn line_comments(&mut self, language_id: &str) -> Option<Vec<String>> {
        self.configuration(language_id)?.line_comments()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::LanguageContribution;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("codehelper-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_detect_language() {
        let registry = LanguageRegistry::new();

        assert_eq!(registry.detect_language(Path::new("main.rs")), Some("rust"));
        assert_eq!(registry.detect_language(Path::new("test.PY")), Some("python"));
        assert_eq!(registry.detect_language(Path::new("Cargo.toml")), Some("toml"));
        assert_eq!(registry.detect_language(Path::new("README.md")), Some("markdown"));
        assert_eq!(registry.detect_language(Path::new("no_extension")), None);
    }

    #[test]
    fn test_builtin_line_comments() {
        let mut registry = LanguageRegistry::new();
        assert_eq!(registry.line_comments("rust"), Some(vec!["//".to_string()]));
        assert_eq!(registry.line_comments("python"), Some(vec!["#".to_string()]));
        assert_eq!(registry.line_comments("markdown"), None);
        assert_eq!(registry.line_comments("no-such-language"), None);
    }

    #[test]
    fn test_contributed_configuration_wins() {
        let path = scratch_file("lua.toml", "[comments]\nlineComment = [\"--\", \"---\"]\n");
        let mut registry = LanguageRegistry::new();
        registry.update_definitions(&Contributions {
            languages: vec![LanguageContribution {
                id: "lua".to_string(),
                extensions: vec!["luau".to_string()],
                configuration: Some(path.clone()),
            }],
            themes: Vec::new(),
        });

        assert_eq!(registry.detect_language(Path::new("x.luau")), Some("lua"));
        assert_eq!(
            registry.line_comments("lua"),
            Some(vec!["--".to_string(), "---".to_string()])
        );

        // Cached: deleting the file does not change the answer
        fs::remove_file(&path).unwrap();
        assert_eq!(registry.line_comments("lua").map(|d| d.len()), Some(2));

        // Clearing drops the contribution and falls back to the built-in table
        registry.clear();
        assert_eq!(registry.line_comments("lua"), Some(vec!["--".to_string()]));
        assert_eq!(registry.detect_language(Path::new("x.luau")), None);
    }

    #[test]
    fn test_malformed_configuration_cached_as_absent() {
        let path = scratch_file("broken.toml", "[comments\nlineComment = ");
        let mut registry = LanguageRegistry::new();
        registry.add_configuration_file("rust", path.clone());

        assert_eq!(registry.line_comments("rust"), None);

        // Fixing the file does not help until the cache is reset
        fs::write(&path, "[comments]\nlineComment = \"//\"\n").unwrap();
        assert_eq!(registry.line_comments("rust"), None);

        registry.add_configuration_file("rust", path.clone());
        assert_eq!(registry.line_comments("rust"), Some(vec!["//".to_string()]));

        let _ = fs::remove_file(&path);
    }
}
