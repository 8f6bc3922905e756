//! Editor features driven by the module lifecycle

pub mod color;
pub mod comment;
pub mod header;

pub use color::ColorHighLight;
pub use comment::CommentColor;
pub use header::AutoHeadComment;
