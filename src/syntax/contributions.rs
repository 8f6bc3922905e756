//! Extension contribution discovery
//!
//! Each extension directory may hold a `package.toml` manifest declaring
//! the languages and themes it contributes:
//!
//! ```text
//! [[contributes.languages]]
//! id = "zig"
//! extensions = [".zig"]
//! configuration = "./language-configuration.toml"
//!
//! [[contributes.themes]]
//! id = "Solarized Dark"
//! path = "./themes/solarized-dark.toml"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;

const MANIFEST_NAME: &str = "package.toml";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    contributes: Option<ManifestContributes>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestContributes {
    #[serde(default)]
    languages: Vec<ManifestLanguage>,
    #[serde(default)]
    themes: Vec<ManifestTheme>,
}

#[derive(Debug, Deserialize)]
struct ManifestLanguage {
    id: String,
    #[serde(default)]
    extensions: Vec<String>,
    configuration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManifestTheme {
    id: String,
    path: String,
}

/// A language contributed by an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageContribution {
    pub id: String,
    /// File extensions without the dot, lowercased
    pub extensions: Vec<String>,
    /// Absolute path of the language configuration file
    pub configuration: Option<PathBuf>,
}

/// A theme contributed by an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeContribution {
    pub id: String,
    /// Absolute path of the theme file
    pub path: PathBuf,
}

/// Everything contributed by a set of extension directories
#[derive(Debug, Clone, Default)]
pub struct Contributions {
    pub languages: Vec<LanguageContribution>,
    pub themes: Vec<ThemeContribution>,
}

impl Contributions {
    /// Scan extension directories for manifests
    ///
    /// Directories without a manifest are skipped silently; unreadable or
    /// malformed manifests are logged and skipped.
    pub fn discover(extension_dirs: &[PathBuf]) -> Self {
        let mut contributions = Self::default();
        for dir in extension_dirs {
            match Self::read_manifest(dir) {
                Ok(Some(manifest)) => contributions.add_manifest(dir, manifest),
                Ok(None) => debug!(dir = %dir.display(), "no extension manifest"),
                Err(e) => warn!(dir = %dir.display(), error = %e, "skipping extension"),
            }
        }
        contributions
    }

    fn read_manifest(dir: &Path) -> Result<Option<Manifest>> {
        let contents = match fs::read_to_string(dir.join(MANIFEST_NAME)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&contents)?))
    }

    fn add_manifest(&mut self, dir: &Path, manifest: Manifest) {
        let Some(contributes) = manifest.contributes else {
            return;
        };
        for language in contributes.languages {
            self.languages.push(LanguageContribution {
                id: language.id,
                extensions: language
                    .extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_lowercase())
                    .collect(),
                configuration: language.configuration.map(|path| dir.join(path)),
            });
        }
        for theme in contributes.themes {
            self.themes.push(ThemeContribution {
                id: theme.id,
                path: dir.join(theme.path),
            });
        }
    }
}
