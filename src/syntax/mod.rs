//! Language and theme metadata
//!
//! This module answers "how does this language write a line comment?" and
//! "what is this theme's editor background?". Definitions come from:
//! - Extension directories that contribute languages and themes
//! - A built-in table of common languages

mod builtin;
mod contributions;
mod language;
mod registry;
mod theme;

pub use builtin::BuiltinLanguage;
pub use contributions::{Contributions, LanguageContribution, ThemeContribution};
pub use language::{CommentRule, LanguageConfiguration, LineComment};
pub use registry::LanguageRegistry;
pub use theme::{ThemeConfiguration, ThemeRegistry};

/// Host-supplied source of per-language comment syntax
pub trait LanguageProvider {
    /// Line comment delimiters for a language, or `None` if it has none
    /// (or its configuration is unavailable)
    fn line_comments(&mut self, language_id: &str) -> Option<Vec<String>>;
}
