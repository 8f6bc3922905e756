//! CodeHelper - editor helpers for header comments, color literals and
//! tagged comments
//!
//! The features talk to the editor only through the traits in [`host`],
//! [`config`] and [`syntax`], so any host that implements them can embed
//! [`CodeHelper`].

pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod extension;
pub mod features;
pub mod host;
pub mod module;
pub mod style;
pub mod syntax;
pub mod terminal;

pub use config::{ConfigChange, ConfigurationService, TomlConfiguration};
pub use document::{Position, Range, TextDocument};
pub use error::{CodeHelperError, Result};
pub use extension::CodeHelper;
pub use host::{DecorationService, EditorId, FileSystem, HostContext, HostEvent, Workspace};
pub use style::DecorationStyle;
