//! Hex color literal highlighting
//!
//! Every `#rgb` / `#rrggbb` literal in a visible editor gets its own color
//! as background. Each editor has a `ColorRenderer` that remembers one
//! decoration per distinct color it has seen.

use regex::Regex;
use tracing::debug;

use crate::color::invert_hex_color;
use crate::config::{get_typed, ColorHighlightParams, COLOR_HIGHLIGHT_KEY};
use crate::document::{Range, TextDocument};
use crate::error::Result;
use crate::host::{DecorationId, DecorationService, EditorId, EventKind, HostContext, HostEvent};
use crate::module::{Feature, Subscriptions};
use crate::style::{Border, DecorationStyle};

const HEX_COLOR_PATTERN: &str = r"(?i)#([0-9a-f]{6}|[0-9a-f]{3})";

const DEFAULT_BORDER_STYLE: &str = "solid";
const DEFAULT_BORDER_WIDTH: &str = "1px";
const DEFAULT_BORDER_RADIUS: &str = "3px";

/// Build the decoration style for one color literal
pub fn color_style(color: &str, params: &ColorHighlightParams) -> DecorationStyle {
    let mut style = DecorationStyle::bg(color);
    let inverted = invert_hex_color(color);

    if params.invert_text_color.unwrap_or(false) {
        if let Some(inverted) = &inverted {
            style = style.with_fg(inverted.clone());
        }
    }

    if params.use_border.unwrap_or(false) {
        if let Some(inverted) = inverted {
            style = style.with_border(Border {
                color: inverted,
                style: params
                    .border_style
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BORDER_STYLE.to_string()),
                width: params
                    .border_width
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BORDER_WIDTH.to_string()),
                radius: params
                    .border_radius
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BORDER_RADIUS.to_string()),
            });
        }
    }

    style
}

/// One distinct color and the ranges it covers in the current scan
#[derive(Debug)]
struct ColorEntry {
    /// Lowercased literal, e.g. `#ff0000`
    color: String,
    decoration: DecorationId,
    ranges: Vec<Range>,
}

/// Color decorations for one editor
#[derive(Debug)]
pub struct ColorRenderer {
    editor: EditorId,
    colors: Vec<ColorEntry>,
}

impl ColorRenderer {
    pub fn new(editor: EditorId) -> Self {
        Self {
            editor,
            colors: Vec::new(),
        }
    }

    /// The editor this renderer draws into
    pub fn editor(&self) -> EditorId {
        self.editor
    }

    /// Scan the document and push the result to the decoration service
    pub fn update(
        &mut self,
        document: &TextDocument,
        pattern: &Regex,
        params: &ColorHighlightParams,
        decorations: &mut dyn DecorationService,
    ) {
        self.scan(document, pattern, params, decorations);
        self.apply(decorations);
    }

    fn scan(
        &mut self,
        document: &TextDocument,
        pattern: &Regex,
        params: &ColorHighlightParams,
        decorations: &mut dyn DecorationService,
    ) {
        for m in pattern.find_iter(document.text()) {
            let range = document.range_at(m.start(), m.end());
            let color = m.as_str().to_lowercase();
            match self.colors.iter_mut().find(|entry| entry.color == color) {
                Some(entry) => entry.ranges.push(range),
                None => {
                    let decoration = decorations.create(&color_style(&color, params));
                    self.colors.push(ColorEntry {
                        color,
                        decoration,
                        ranges: vec![range],
                    });
                }
            }
        }
    }

    /// Push every entry's ranges (empty ones included) and reset them
    fn apply(&mut self, decorations: &mut dyn DecorationService) {
        for entry in &mut self.colors {
            decorations.set_ranges(self.editor, entry.decoration, &entry.ranges);
            entry.ranges.clear();
        }
    }

    /// Release every decoration and forget all colors
    pub fn clear(&mut self, decorations: &mut dyn DecorationService) {
        for entry in self.colors.drain(..) {
            decorations.dispose(entry.decoration);
        }
    }
}

/// Color literal highlighting feature
pub struct ColorHighLight {
    pattern: Option<Regex>,
    renderers: Vec<ColorRenderer>,
}

impl ColorHighLight {
    pub fn new() -> Self {
        Self {
            pattern: None,
            renderers: Vec::new(),
        }
    }

    /// Editors that currently have a renderer
    pub fn tracked_editors(&self) -> Vec<EditorId> {
        self.renderers.iter().map(ColorRenderer::editor).collect()
    }

    fn params(ctx: &HostContext<'_>) -> ColorHighlightParams {
        get_typed(ctx.config, COLOR_HIGHLIGHT_KEY).unwrap_or_default()
    }

    fn init_renderers(&mut self, ctx: &mut HostContext<'_>) {
        for editor in ctx.workspace.visible_editors() {
            self.update_renderer(editor, ctx);
        }
    }

    /// Update an editor's renderer, creating it on first sight
    fn update_renderer(&mut self, editor: EditorId, ctx: &mut HostContext<'_>) {
        let Some(pattern) = &self.pattern else {
            return;
        };
        let workspace = ctx.workspace;
        let Some(document) = workspace.document(editor) else {
            return;
        };
        let params = Self::params(ctx);

        let index = match self.renderers.iter().position(|r| r.editor == editor) {
            Some(index) => index,
            None => {
                self.renderers.push(ColorRenderer::new(editor));
                self.renderers.len() - 1
            }
        };
        self.renderers[index].update(document, pattern, &params, ctx.decorations);
    }

    /// Drop renderers whose editors are no longer visible
    fn prune_renderers(&mut self, ctx: &mut HostContext<'_>) {
        let visible = ctx.workspace.visible_editors();
        let decorations = &mut *ctx.decorations;
        self.renderers.retain_mut(|renderer| {
            let keep = visible.contains(&renderer.editor);
            if !keep {
                renderer.clear(decorations);
            }
            keep
        });
    }

    /// Rebuild every renderer's decorations from fresh configuration
    fn reupdate_all(&mut self, ctx: &mut HostContext<'_>) {
        let Some(pattern) = &self.pattern else {
            return;
        };
        let params = Self::params(ctx);
        let workspace = ctx.workspace;
        for renderer in &mut self.renderers {
            renderer.clear(ctx.decorations);
            if let Some(document) = workspace.document(renderer.editor) {
                renderer.update(document, pattern, &params, ctx.decorations);
            }
        }
    }

    fn clear_renderers(&mut self, ctx: &mut HostContext<'_>) {
        for renderer in &mut self.renderers {
            renderer.clear(ctx.decorations);
        }
        self.renderers.clear();
    }
}

impl Default for ColorHighLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for ColorHighLight {
    fn name(&self) -> &'static str {
        "ColorHighLight"
    }

    fn on_init(&mut self, _ctx: &mut HostContext<'_>) -> Result<()> {
        self.pattern = Some(Regex::new(HEX_COLOR_PATTERN)?);
        Ok(())
    }

    fn on_enable(&mut self, ctx: &mut HostContext<'_>, listeners: &mut Subscriptions) {
        self.init_renderers(ctx);
        listeners.add(EventKind::ActiveEditorChanged);
        listeners.add(EventKind::TextDocumentChanged);
        listeners.add(EventKind::ConfigurationChanged);
    }

    fn on_disable(&mut self, ctx: &mut HostContext<'_>) {
        self.clear_renderers(ctx);
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>) {
        match event {
            HostEvent::ActiveEditorChanged(editor) => {
                if let Some(editor) = editor {
                    self.update_renderer(*editor, ctx);
                }
                self.prune_renderers(ctx);
            }
            HostEvent::TextDocumentChanged(_) => {
                if let Some(editor) = ctx.workspace.active_editor() {
                    self.update_renderer(editor, ctx);
                }
            }
            HostEvent::ConfigurationChanged(change) if change.affects(COLOR_HIGHLIGHT_KEY) => {
                debug!(module = self.name(), "color parameters changed");
                self.reupdate_all(ctx);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigChange;
    use crate::document::Position;
    use crate::host::testing::FakeHost;
    use crate::module::Module;

    fn range(line: usize, start: usize, end: usize) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    fn background(host: &FakeHost, editor: EditorId, color: &str) -> Vec<Range> {
        host.applied(editor)
            .into_iter()
            .filter(|(style, _)| style.background.as_deref() == Some(color))
            .flat_map(|(_, ranges)| ranges)
            .collect()
    }

    fn started(host: &mut FakeHost) -> Module {
        let mut module = Module::new(Box::new(ColorHighLight::new()));
        module.init(&mut host.context());
        module
    }

    #[test]
    fn test_color_style() {
        let plain = color_style("#ff0000", &ColorHighlightParams::default());
        assert_eq!(plain, DecorationStyle::bg("#ff0000"));

        let params = ColorHighlightParams {
            invert_text_color: Some(true),
            use_border: Some(true),
            border_width: Some("2px".to_string()),
            ..Default::default()
        };
        let styled = color_style("#ff0000", &params);
        assert_eq!(styled.foreground.as_deref(), Some("#00ffff"));
        let border = styled.border.unwrap();
        assert_eq!(border.color, "#00ffff");
        assert_eq!(border.width, "2px");
        assert_eq!(border.style, "solid");
        assert_eq!(border.radius, "3px");
    }

    #[test]
    fn test_scan_groups_case_insensitively() {
        let mut host = FakeHost::new();
        let editor = host
            .editors
            .open(TextDocument::new("plaintext", "a #FF0000 b #ff0000 c #00FF00"));
        let _module = started(&mut host);

        assert_eq!(
            background(&host, editor, "#ff0000"),
            vec![range(0, 2, 9), range(0, 12, 19)]
        );
        assert_eq!(background(&host, editor, "#00ff00"), vec![range(0, 22, 29)]);
        assert_eq!(host.decorations.len(), 2);
    }

    #[test]
    fn test_short_literals_and_multiline() {
        let mut host = FakeHost::new();
        let editor = host
            .editors
            .open(TextDocument::new("css", "a { color: #FFF; }\nb { color: #fff; }"));
        let _module = started(&mut host);

        assert_eq!(
            background(&host, editor, "#fff"),
            vec![range(0, 11, 15), range(1, 11, 15)]
        );
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut feature = ColorHighLight::new();
        let mut host = FakeHost::new();
        let editor = host
            .editors
            .open(TextDocument::new("plaintext", "#123 and #abcdef"));
        feature.on_init(&mut host.context()).unwrap();

        feature.update_renderer(editor, &mut host.context());
        let first = host.applied(editor);
        feature.update_renderer(editor, &mut host.context());
        let second = host.applied(editor);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(host.decorations.len(), 2);
    }

    #[test]
    fn test_removed_color_gets_empty_ranges() {
        let mut host = FakeHost::new();
        let editor = host.editors.open(TextDocument::new("plaintext", "#abc #def"));
        let mut module = started(&mut host);

        host.editors.document_mut(editor).unwrap().set_text("#def");
        module.handle_event(&HostEvent::TextDocumentChanged(editor), &mut host.context());

        assert!(background(&host, editor, "#abc").is_empty());
        assert_eq!(background(&host, editor, "#def"), vec![range(0, 0, 4)]);
        // The entry persists for the renderer's lifetime
        assert_eq!(host.decorations.len(), 2);
    }

    #[test]
    fn test_active_editor_change_prunes_hidden() {
        let mut host = FakeHost::new();
        let a = host.editors.open(TextDocument::new("plaintext", "#111111"));
        let b = host.editors.open(TextDocument::new("plaintext", "#222222"));
        let mut module = started(&mut host);
        assert_eq!(host.decorations.len(), 2);

        host.editors.set_visible(a, false);
        host.editors.set_active(Some(b));
        module.handle_event(&HostEvent::ActiveEditorChanged(Some(b)), &mut host.context());

        assert_eq!(host.decorations.len(), 1);
        assert!(host.applied(a).is_empty());
        assert_eq!(background(&host, b, "#222222"), vec![range(0, 0, 7)]);
    }

    #[test]
    fn test_new_editor_gets_renderer() {
        let mut host = FakeHost::new();
        let mut feature = ColorHighLight::new();
        feature.on_init(&mut host.context()).unwrap();
        let mut listeners = Subscriptions::default();
        feature.on_enable(&mut host.context(), &mut listeners);
        assert!(feature.tracked_editors().is_empty());

        let editor = host.editors.open(TextDocument::new("plaintext", "#0f0"));
        feature.on_event(&HostEvent::ActiveEditorChanged(Some(editor)), &mut host.context());
        assert_eq!(feature.tracked_editors(), vec![editor]);
    }

    #[test]
    fn test_configuration_change_rebuilds_styles() {
        let mut host = FakeHost::new();
        let editor = host.editors.open(TextDocument::new("plaintext", "#ff0000"));
        let mut module = started(&mut host);

        let change = host.config.set(
            "ColorHighLightParam",
            toml::Value::Table(
                "InvertTextColor = true".parse::<toml::Table>().unwrap(),
            ),
        );
        module.handle_event(&HostEvent::ConfigurationChanged(change), &mut host.context());

        let applied = host.applied(editor);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0.foreground.as_deref(), Some("#00ffff"));
        assert_eq!(host.decorations.len(), 1);
    }

    #[test]
    fn test_unrelated_configuration_change_ignored() {
        let mut host = FakeHost::new();
        host.editors.open(TextDocument::new("plaintext", "#ff0000"));
        let mut module = started(&mut host);

        module.handle_event(
            &HostEvent::ConfigurationChanged(ConfigChange::new(["author"])),
            &mut host.context(),
        );
        assert_eq!(host.decorations.len(), 1);
    }

    #[test]
    fn test_disable_releases_decorations() {
        let mut host = FakeHost::new();
        host.editors.open(TextDocument::new("plaintext", "#ff0000 #00ff00"));
        let mut module = started(&mut host);
        assert_eq!(host.decorations.len(), 2);

        let change = host.config.set("ColorHighLightEnable", false);
        module.handle_event(&HostEvent::ConfigurationChanged(change), &mut host.context());
        assert!(host.decorations.is_empty());
    }
}
