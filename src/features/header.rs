//! Header comment insertion for newly created files

use std::path::Path;

use chrono::Local;
use tracing::{debug, error};

use crate::config::{self, get_typed, HeadCommentTemplate, HEAD_COMMENT_KEY};
use crate::error::Result;
use crate::host::{EventKind, HostContext, HostEvent};
use crate::module::{Feature, Subscriptions};

const AUTHOR_PLACEHOLDER: &str = "${author}";
const DATE_PLACEHOLDER: &str = "${date}";

/// Current local time in the format used for `${date}`
pub fn local_timestamp() -> String {
    Local::now().format("%Y/%-m/%-d %H:%M:%S").to_string()
}

/// Substitute the first `${author}` and the first `${date}` in a template
///
/// Any other `${...}` text is left as is.
pub fn render_template(template: &str, author: &str, date: &str) -> String {
    template
        .replacen(AUTHOR_PLACEHOLDER, author, 1)
        .replacen(DATE_PLACEHOLDER, date, 1)
}

/// Writes a configured header comment at the top of every new file
pub struct AutoHeadComment {
    timestamp: fn() -> String,
}

impl AutoHeadComment {
    pub fn new() -> Self {
        Self {
            timestamp: local_timestamp,
        }
    }

    /// Use a custom clock for `${date}`
    pub fn with_timestamp(timestamp: fn() -> String) -> Self {
        Self { timestamp }
    }

    /// Prepend the header to one file
    ///
    /// Returns false when no template matches the file's extension.
    fn try_write_comment(&self, path: &Path, ctx: &HostContext<'_>) -> Result<bool> {
        let language = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        let templates: Vec<HeadCommentTemplate> =
            get_typed(ctx.config, HEAD_COMMENT_KEY).unwrap_or_default();
        let Some(template) = templates.iter().find(|t| t.language == language) else {
            return Ok(false);
        };

        let author = config::author(ctx.config);
        let comment = render_template(&template.comment, &author, &(self.timestamp)());

        let original = ctx.fs.read_to_string(path)?;
        ctx.fs.write(path, &format!("{}\n\n{}", comment, original))?;
        Ok(true)
    }
}

impl Default for AutoHeadComment {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for AutoHeadComment {
    fn name(&self) -> &'static str {
        "AutoHeadComment"
    }

    fn on_enable(&mut self, _ctx: &mut HostContext<'_>, listeners: &mut Subscriptions) {
        listeners.add(EventKind::FilesCreated);
    }

    fn on_disable(&mut self, _ctx: &mut HostContext<'_>) {}

    fn on_event(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>) {
        let HostEvent::FilesCreated(paths) = event else {
            return;
        };
        for path in paths {
            match self.try_write_comment(path, ctx) {
                Ok(true) => debug!(module = self.name(), path = %path.display(), "header written"),
                Ok(false) => {}
                Err(e) => error!(module = self.name(), path = %path.display(), error = %e, "header not written"),
            }
        }
    }
}
