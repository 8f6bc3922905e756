//! Tagged comment highlighting
//!
//! Single-line comments that start with a configured tag (`// TODO`,
//! `# ! careful`, `-- ? why`) are drawn in the tag's style. The comment
//! delimiter comes from the editor's language; languages without a line
//! comment are left alone.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, error};

use crate::config::{default_comment_tags, get_typed, CommentTagConfig, COMMENT_TAG_KEY};
use crate::document::{Range, TextDocument};
use crate::host::{DecorationId, DecorationService, EditorId, EventKind, HostContext, HostEvent};
use crate::module::{Feature, Subscriptions};
use crate::style::DecorationStyle;
use crate::syntax::LanguageProvider;

/// Escape text for literal use in a pattern, forward slashes included
pub fn escape_pattern(text: &str) -> String {
    regex::escape(text).replace('/', "\\/")
}

/// A configured comment tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag text as configured, e.g. `TODO`
    pub name: String,
    /// Pattern fragment matching the tag literally
    pub escaped: String,
    pub style: DecorationStyle,
    pub decoration: DecorationId,
}

/// Build the decoration style for a tag
pub fn tag_style(config: &CommentTagConfig) -> DecorationStyle {
    let mut style = DecorationStyle::fg(config.color.clone());
    if config.strikethrough {
        style = style.with_strikethrough();
    }
    if config.underline {
        style = style.with_underline();
    }
    if config.bold {
        style = style.with_bold();
    }
    if config.italic {
        style = style.with_italic();
    }
    style
}

/// The configured tags, in configuration order
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    /// Build tags from configuration, creating one decoration per tag
    pub fn from_config(entries: &[CommentTagConfig], decorations: &mut dyn DecorationService) -> Self {
        let tags = entries
            .iter()
            .map(|entry| {
                let style = tag_style(entry);
                Tag {
                    name: entry.tag.clone(),
                    escaped: escape_pattern(&entry.tag),
                    decoration: decorations.create(&style),
                    style,
                }
            })
            .collect();
        Self { tags }
    }

    /// Release every tag decoration
    pub fn release(&mut self, decorations: &mut dyn DecorationService) {
        for tag in self.tags.drain(..) {
            decorations.dispose(tag.decoration);
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Index of the tag matching `text`, ignoring case
    pub fn find(&self, text: &str) -> Option<usize> {
        let wanted = text.to_lowercase();
        self.tags.iter().position(|tag| tag.name.to_lowercase() == wanted)
    }
}

/// How to find tagged comments in one language
#[derive(Debug, Clone)]
pub struct LanguageDescriptor {
    pub language_id: String,
    /// Escaped delimiter alternation, e.g. `\/\/` or `#|\/\/`
    pub delimiter: String,
    /// Match pattern; `None` when the language has no line comment
    pub pattern: Option<Regex>,
}

impl LanguageDescriptor {
    /// Descriptor for a language without line comments
    pub fn unsupported(language_id: &str) -> Self {
        Self {
            language_id: language_id.to_string(),
            delimiter: String::new(),
            pattern: None,
        }
    }

    /// Build the descriptor for a language's delimiters and the current tags
    ///
    /// The pattern is `(DELIM)+( |\t)*(TAG|...)+(REST)`, case-insensitive,
    /// where REST runs to the end of the line without the line break.
    /// Capture group 3 is the tag.
    pub fn build(
        language_id: &str,
        delimiters: &[String],
        tags: &TagRegistry,
    ) -> Result<Self, regex::Error> {
        if delimiters.is_empty() || tags.is_empty() {
            return Ok(Self::unsupported(language_id));
        }

        let delimiter = delimiters
            .iter()
            .map(|d| escape_pattern(d))
            .collect::<Vec<_>>()
            .join("|");
        let alternatives = tags
            .tags()
            .iter()
            .map(|tag| tag.escaped.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            "(?i)({})+( |\\t)*({})+([^\\r\\n]*)",
            delimiter, alternatives
        ))?;

        Ok(Self {
            language_id: language_id.to_string(),
            delimiter,
            pattern: Some(pattern),
        })
    }

    pub fn supported(&self) -> bool {
        self.pattern.is_some()
    }
}

/// Language descriptors, cached per language id until cleared
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: HashMap<String, LanguageDescriptor>,
}

impl DescriptorCache {
    /// Get or build the descriptor for a language
    ///
    /// Unsupported languages are cached too, so the host is asked once.
    pub fn get(
        &mut self,
        language_id: &str,
        languages: &mut dyn LanguageProvider,
        tags: &TagRegistry,
    ) -> &LanguageDescriptor {
        self.descriptors
            .entry(language_id.to_string())
            .or_insert_with(|| {
                let descriptor = match languages.line_comments(language_id) {
                    Some(delimiters) => LanguageDescriptor::build(language_id, &delimiters, tags)
                        .unwrap_or_else(|e| {
                            error!(language = language_id, error = %e, "bad comment pattern");
                            LanguageDescriptor::unsupported(language_id)
                        }),
                    None => LanguageDescriptor::unsupported(language_id),
                };
                debug!(
                    language = language_id,
                    supported = descriptor.supported(),
                    "comment color support"
                );
                descriptor
            })
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Tagged comment decorations for one editor
#[derive(Debug)]
pub struct CommentRenderer {
    editor: EditorId,
    pattern: Regex,
    /// Ranges per tag, aligned with the tag registry
    ranges: Vec<Vec<Range>>,
}

impl CommentRenderer {
    pub fn new(editor: EditorId, pattern: Regex) -> Self {
        Self {
            editor,
            pattern,
            ranges: Vec::new(),
        }
    }

    pub fn editor(&self) -> EditorId {
        self.editor
    }

    /// Scan the document and push the result to the decoration service
    pub fn update(
        &mut self,
        document: &TextDocument,
        tags: &TagRegistry,
        decorations: &mut dyn DecorationService,
    ) {
        self.find_single_line_comments(document, tags);
        self.apply(tags, decorations);
    }

    fn find_single_line_comments(&mut self, document: &TextDocument, tags: &TagRegistry) {
        self.ranges.resize_with(tags.len(), Vec::new);
        for caps in self.pattern.captures_iter(document.text()) {
            let (Some(whole), Some(tag)) = (caps.get(0), caps.get(3)) else {
                continue;
            };
            if let Some(index) = tags.find(tag.as_str()) {
                self.ranges[index].push(document.range_at(whole.start(), whole.end()));
            }
        }
    }

    fn apply(&mut self, tags: &TagRegistry, decorations: &mut dyn DecorationService) {
        for (tag, ranges) in tags.tags().iter().zip(self.ranges.iter_mut()) {
            decorations.set_ranges(self.editor, tag.decoration, ranges);
            ranges.clear();
        }
    }
}

/// Tagged comment highlighting feature
#[derive(Default)]
pub struct CommentColor {
    tags: TagRegistry,
    descriptors: DescriptorCache,
    renderers: Vec<CommentRenderer>,
}

impl CommentColor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editors that currently have a renderer
    pub fn tracked_editors(&self) -> Vec<EditorId> {
        self.renderers.iter().map(CommentRenderer::editor).collect()
    }

    fn init_tags(&mut self, ctx: &mut HostContext<'_>) {
        let entries: Vec<CommentTagConfig> =
            get_typed(ctx.config, COMMENT_TAG_KEY).unwrap_or_else(default_comment_tags);
        self.tags = TagRegistry::from_config(&entries, ctx.decorations);
    }

    fn init_renderers(&mut self, ctx: &mut HostContext<'_>) {
        if !self.renderers.is_empty() {
            error!(module = self.name(), "renderers already initialized");
            return;
        }
        for editor in ctx.workspace.visible_editors() {
            self.update_editor(editor, ctx);
        }
    }

    /// Update an editor's renderer, creating it when its language is supported
    fn update_editor(&mut self, editor: EditorId, ctx: &mut HostContext<'_>) {
        let workspace = ctx.workspace;
        let Some(document) = workspace.document(editor) else {
            return;
        };

        let index = match self.renderers.iter().position(|r| r.editor == editor) {
            Some(index) => index,
            None => {
                let descriptor =
                    self.descriptors
                        .get(document.language_id(), ctx.languages, &self.tags);
                let Some(pattern) = &descriptor.pattern else {
                    return;
                };
                self.renderers.push(CommentRenderer::new(editor, pattern.clone()));
                self.renderers.len() - 1
            }
        };
        self.renderers[index].update(document, &self.tags, ctx.decorations);
    }

    /// Drop renderers whose editors are no longer visible
    fn prune_renderers(&mut self, ctx: &HostContext<'_>) {
        let visible = ctx.workspace.visible_editors();
        self.renderers.retain(|r| visible.contains(&r.editor));
    }

    /// Release tag decorations and forget every renderer and descriptor
    fn clear_decorations(&mut self, ctx: &mut HostContext<'_>) {
        self.tags.release(ctx.decorations);
        self.renderers.clear();
        self.descriptors.clear();
    }
}

impl Feature for CommentColor {
    fn name(&self) -> &'static str {
        "CommentColor"
    }

    fn on_enable(&mut self, ctx: &mut HostContext<'_>, listeners: &mut Subscriptions) {
        self.init_tags(ctx);
        self.init_renderers(ctx);
        listeners.add(EventKind::ActiveEditorChanged);
        listeners.add(EventKind::TextDocumentChanged);
        listeners.add(EventKind::ConfigurationChanged);
        listeners.add(EventKind::ExtensionsChanged);
    }

    fn on_disable(&mut self, ctx: &mut HostContext<'_>) {
        self.clear_decorations(ctx);
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>) {
        match event {
            HostEvent::ActiveEditorChanged(editor) => {
                if let Some(editor) = editor {
                    self.update_editor(*editor, ctx);
                }
                self.prune_renderers(ctx);
            }
            HostEvent::TextDocumentChanged(_) => {
                if let Some(editor) = ctx.workspace.active_editor() {
                    self.update_editor(editor, ctx);
                }
            }
            HostEvent::ConfigurationChanged(change) if change.affects(COMMENT_TAG_KEY) => {
                self.clear_decorations(ctx);
                self.init_tags(ctx);
                self.init_renderers(ctx);
            }
            HostEvent::ExtensionsChanged => self.descriptors.clear(),
            _ => {}
        }
    }
}
