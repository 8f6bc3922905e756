//! Host editor services
//!
//! The features never talk to an editor directly. Everything they need from
//! the host (open editors, decoration rendering, configuration, language
//! metadata and file I/O) goes through the traits in this module, bundled
//! per dispatch in a `HostContext`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ConfigChange, ConfigurationService};
use crate::document::{Range, TextDocument};
use crate::style::DecorationStyle;
use crate::syntax::LanguageProvider;

/// Identity of an open editor view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub usize);

/// Handle to a decoration type created by the decoration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId(pub usize);

/// Open editors and their documents
pub trait Workspace {
    /// Editors currently visible, in display order
    fn visible_editors(&self) -> Vec<EditorId>;
    /// The editor with focus
    fn active_editor(&self) -> Option<EditorId>;
    /// The document shown in an editor
    fn document(&self, editor: EditorId) -> Option<&TextDocument>;
}

/// Styled range rendering
pub trait DecorationService {
    /// Create a decoration type with the given style
    fn create(&mut self, style: &DecorationStyle) -> DecorationId;
    /// Replace the ranges a decoration covers in one editor
    fn set_ranges(&mut self, editor: EditorId, decoration: DecorationId, ranges: &[Range]);
    /// Release a decoration type, removing it from every editor
    fn dispose(&mut self, decoration: DecorationId);
}

/// File read/write primitives
pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// `FileSystem` backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}

/// Events delivered by the host, one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Focus moved to another editor (or to none)
    ActiveEditorChanged(Option<EditorId>),
    /// The text of a document changed
    TextDocumentChanged(EditorId),
    /// Configuration values changed
    ConfigurationChanged(ConfigChange),
    /// Files were created on disk
    FilesCreated(Vec<PathBuf>),
    /// Installed extensions changed; language metadata may be stale
    ExtensionsChanged,
}

/// Event categories a module can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ActiveEditorChanged,
    TextDocumentChanged,
    ConfigurationChanged,
    FilesCreated,
    ExtensionsChanged,
}

impl HostEvent {
    /// The category of this event
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::ActiveEditorChanged(_) => EventKind::ActiveEditorChanged,
            HostEvent::TextDocumentChanged(_) => EventKind::TextDocumentChanged,
            HostEvent::ConfigurationChanged(_) => EventKind::ConfigurationChanged,
            HostEvent::FilesCreated(_) => EventKind::FilesCreated,
            HostEvent::ExtensionsChanged => EventKind::ExtensionsChanged,
        }
    }
}

/// Borrowed host services for the duration of one call
pub struct HostContext<'h> {
    pub workspace: &'h dyn Workspace,
    pub config: &'h dyn ConfigurationService,
    pub decorations: &'h mut dyn DecorationService,
    pub languages: &'h mut dyn LanguageProvider,
    pub fs: &'h dyn FileSystem,
}

/// A simple list of editors, each showing one document
#[derive(Debug, Default)]
pub struct EditorSet {
    editors: Vec<(EditorId, TextDocument)>,
    hidden: Vec<EditorId>,
    active: Option<EditorId>,
    next_id: usize,
}

impl EditorSet {
    /// Create an empty editor set
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document in a new visible editor
    pub fn open(&mut self, document: TextDocument) -> EditorId {
        let id = EditorId(self.next_id);
        self.next_id += 1;
        self.editors.push((id, document));
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    /// Close an editor
    pub fn close(&mut self, editor: EditorId) {
        self.editors.retain(|(id, _)| *id != editor);
        self.hidden.retain(|id| *id != editor);
        if self.active == Some(editor) {
            self.active = self.editors.first().map(|(id, _)| *id);
        }
    }

    /// Hide or show an editor without closing it
    pub fn set_visible(&mut self, editor: EditorId, visible: bool) {
        self.hidden.retain(|id| *id != editor);
        if !visible {
            self.hidden.push(editor);
        }
    }

    /// Give focus to an editor
    pub fn set_active(&mut self, editor: Option<EditorId>) {
        self.active = editor;
    }

    /// Mutable access to an editor's document
    pub fn document_mut(&mut self, editor: EditorId) -> Option<&mut TextDocument> {
        self.editors
            .iter_mut()
            .find(|(id, _)| *id == editor)
            .map(|(_, doc)| doc)
    }

    /// All open editors, visible or not
    pub fn editors(&self) -> impl Iterator<Item = EditorId> + '_ {
        self.editors.iter().map(|(id, _)| *id)
    }
}

impl Workspace for EditorSet {
    fn visible_editors(&self) -> Vec<EditorId> {
        self.editors
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.hidden.contains(id))
            .collect()
    }

    fn active_editor(&self) -> Option<EditorId> {
        self.active
    }

    fn document(&self, editor: EditorId) -> Option<&TextDocument> {
        self.editors
            .iter()
            .find(|(id, _)| *id == editor)
            .map(|(_, doc)| doc)
    }
}

/// A decoration type and the ranges it covers per editor
#[derive(Debug, Clone)]
pub struct Decoration {
    pub style: DecorationStyle,
    pub ranges: HashMap<EditorId, Vec<Range>>,
}

/// In-memory `DecorationService` that records what was applied
///
/// Renderers such as the terminal preview read the recorded ranges back.
#[derive(Debug, Default)]
pub struct DecorationStore {
    decorations: HashMap<DecorationId, Decoration>,
    /// Creation order, so later decorations draw on top
    order: Vec<DecorationId>,
    next_id: usize,
}

impl DecorationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live decoration types
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    /// Check if no decoration types are live
    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Look up a decoration type
    pub fn get(&self, decoration: DecorationId) -> Option<&Decoration> {
        self.decorations.get(&decoration)
    }

    /// Ranges a decoration covers in one editor
    pub fn ranges(&self, editor: EditorId, decoration: DecorationId) -> &[Range] {
        self.decorations
            .get(&decoration)
            .and_then(|d| d.ranges.get(&editor))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every non-empty (style, ranges) pair for an editor, in creation order
    pub fn for_editor(&self, editor: EditorId) -> Vec<(&DecorationStyle, &[Range])> {
        self.order
            .iter()
            .filter_map(|id| self.decorations.get(id))
            .filter_map(|d| {
                d.ranges
                    .get(&editor)
                    .filter(|ranges| !ranges.is_empty())
                    .map(|ranges| (&d.style, ranges.as_slice()))
            })
            .collect()
    }
}

impl DecorationService for DecorationStore {
    fn create(&mut self, style: &DecorationStyle) -> DecorationId {
        let id = DecorationId(self.next_id);
        self.next_id += 1;
        self.decorations.insert(
            id,
            Decoration {
                style: style.clone(),
                ranges: HashMap::new(),
            },
        );
        self.order.push(id);
        id
    }

    fn set_ranges(&mut self, editor: EditorId, decoration: DecorationId, ranges: &[Range]) {
        if let Some(d) = self.decorations.get_mut(&decoration) {
            d.ranges.insert(editor, ranges.to_vec());
        }
    }

    fn dispose(&mut self, decoration: DecorationId) {
        self.decorations.remove(&decoration);
        self.order.retain(|id| *id != decoration);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Position;

    fn range(line: usize, start: usize, end: usize) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    #[test]
    fn test_editor_set_visibility() {
        let mut editors = EditorSet::new();
        let a = editors.open(TextDocument::new("rust", "fn main() {}"));
        let b = editors.open(TextDocument::new("python", "pass"));

        assert_eq!(editors.active_editor(), Some(a));
        assert_eq!(editors.visible_editors(), vec![a, b]);

        editors.set_visible(a, false);
        assert_eq!(editors.visible_editors(), vec![b]);
        assert!(editors.document(a).is_some());

        editors.close(a);
        assert_eq!(editors.active_editor(), Some(b));
        assert!(editors.document(a).is_none());
    }

    #[test]
    fn test_decoration_store() {
        let mut store = DecorationStore::new();
        let editor = EditorId(0);
        let red = store.create(&DecorationStyle::bg("#ff0000"));
        let blue = store.create(&DecorationStyle::bg("#0000ff"));

        store.set_ranges(editor, red, &[range(0, 0, 4)]);
        store.set_ranges(editor, blue, &[]);
        assert_eq!(store.ranges(editor, red), &[range(0, 0, 4)]);
        assert_eq!(store.for_editor(editor).len(), 1);

        store.dispose(red);
        assert!(store.get(red).is_none());
        assert!(store.ranges(editor, red).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(HostEvent::ExtensionsChanged.kind(), EventKind::ExtensionsChanged);
        assert_eq!(
            HostEvent::FilesCreated(vec![PathBuf::from("a.rs")]).kind(),
            EventKind::FilesCreated
        );
    }
}
