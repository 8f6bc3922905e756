//! Language configuration files
//!
//! A language configuration describes the comment syntax of one language:
//!
//! ```text
//! [comments]
//! lineComment = "//"            # or ["//", "///"]
//! blockComment = ["/*", "*/"]
//! ```

use serde::Deserialize;

use crate::error::Result;

/// One or more line comment delimiters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LineComment {
    Single(String),
    Multiple(Vec<String>),
}

impl LineComment {
    /// Non-empty delimiters, in declaration order
    pub fn delimiters(&self) -> Vec<String> {
        let all = match self {
            LineComment::Single(delimiter) => vec![delimiter.clone()],
            LineComment::Multiple(delimiters) => delimiters.clone(),
        };
        all.into_iter().filter(|d| !d.is_empty()).collect()
    }
}

/// Comment syntax of a language
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRule {
    pub line_comment: Option<LineComment>,
    pub block_comment: Option<(String, String)>,
}

/// A complete language configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LanguageConfiguration {
    #[serde(default)]
    pub comments: Option<CommentRule>,
}

impl LanguageConfiguration {
    /// Parse a configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Create a configuration with the given line comment delimiters
    pub fn with_line_comments(delimiters: &[&str]) -> Self {
        let line_comment = match delimiters {
            [] => None,
            [single] => Some(LineComment::Single(single.to_string())),
            many => Some(LineComment::Multiple(
                many.iter().map(|d| d.to_string()).collect(),
            )),
        };
        Self {
            comments: Some(CommentRule {
                line_comment,
                block_comment: None,
            }),
        }
    }

    /// Line comment delimiters, or `None` if the language has none
    pub fn line_comments(&self) -> Option<Vec<String>> {
        let delimiters = self.comments.as_ref()?.line_comment.as_ref()?.delimiters();
        if delimiters.is_empty() {
            None
        } else {
            Some(delimiters)
        }
    }
}
