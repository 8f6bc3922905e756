//! Terminal preview of a decorated document using crossterm
//!
//! Nothing here is interactive: the document is written once, line by line,
//! with every decoration translated to terminal colors and attributes.

use std::io::Write;

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use unicode_width::UnicodeWidthChar;

use crate::color::hex_to_rgb;
use crate::document::{Position, Range, TextDocument};
use crate::error::Result;
use crate::style::DecorationStyle;

const FALLBACK_COLS: u16 = 80;

/// A run of characters sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: DecorationStyle,
}

/// Lay one decoration style over another; set fields of `top` win
fn overlay(base: &mut DecorationStyle, top: &DecorationStyle) {
    if top.foreground.is_some() {
        base.foreground = top.foreground.clone();
    }
    if top.background.is_some() {
        base.background = top.background.clone();
    }
    if top.border.is_some() {
        base.border = top.border.clone();
    }
    base.bold |= top.bold;
    base.italic |= top.italic;
    base.underline |= top.underline;
    base.strikethrough |= top.strikethrough;
}

/// Split a line into styled spans, clipped to `max_cols` display columns
///
/// Decorations are applied in order, so later ones draw on top.
pub fn line_spans(
    line: &str,
    line_idx: usize,
    decorations: &[(&DecorationStyle, &[Range])],
    max_cols: usize,
) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut width = 0;

    for (character, ch) in line.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_cols {
            break;
        }
        width += ch_width;

        let pos = Position::new(line_idx, character);
        let mut style = DecorationStyle::default();
        for (decoration, ranges) in decorations {
            if ranges.iter().any(|r| r.contains(pos)) {
                overlay(&mut style, decoration);
            }
        }

        match spans.last_mut() {
            Some(last) if last.style == style => last.text.push(ch),
            _ => spans.push(Span {
                text: ch.to_string(),
                style,
            }),
        }
    }

    spans
}

/// Map a hex color string to a terminal color
fn terminal_color(hex: &str) -> Option<Color> {
    let rgb = hex_to_rgb(hex)?;
    Some(Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    })
}

/// Writes decorated documents to a terminal
#[derive(Debug, Clone)]
pub struct Preview {
    /// Terminal width in columns
    cols: u16,
    /// Draw a line number gutter
    line_numbers: bool,
    /// Theme background behind undecorated text
    background: Option<Color>,
}

impl Preview {
    /// Size the preview to the current terminal
    pub fn new() -> Self {
        let cols = terminal::size().map(|(cols, _)| cols).unwrap_or(FALLBACK_COLS);
        Self::with_width(cols)
    }

    /// Preview with a fixed width
    pub fn with_width(cols: u16) -> Self {
        Self {
            cols,
            line_numbers: true,
            background: None,
        }
    }

    /// Toggle the line number gutter
    pub fn line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Use a theme background; unparsable colors are ignored
    pub fn background(mut self, hex: Option<&str>) -> Self {
        self.background = hex.and_then(terminal_color);
        self
    }

    /// Width of the gutter including its separator space
    fn gutter_width(&self, line_count: usize) -> usize {
        if !self.line_numbers {
            return 0;
        }
        line_count.to_string().len().max(3) + 1
    }

    /// Write a document and its decorations
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        document: &TextDocument,
        decorations: &[(&DecorationStyle, &[Range])],
    ) -> Result<()> {
        let line_count = document.line_count();
        let gutter = self.gutter_width(line_count);
        let text_cols = (self.cols as usize).saturating_sub(gutter);

        for line_idx in 0..line_count {
            let line = document.line(line_idx).unwrap_or("");
            if gutter > 0 {
                queue!(
                    out,
                    SetAttribute(Attribute::Dim),
                    Print(format!("{:>width$} ", line_idx + 1, width = gutter - 1)),
                    SetAttribute(Attribute::Reset)
                )?;
            }
            for span in line_spans(line, line_idx, decorations, text_cols) {
                self.write_span(out, &span)?;
            }
            queue!(out, ResetColor, SetAttribute(Attribute::Reset), Print("\n"))?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_span<W: Write>(&self, out: &mut W, span: &Span) -> Result<()> {
        let style = &span.style;
        if style.is_default() && self.background.is_none() {
            queue!(out, Print(&span.text))?;
            return Ok(());
        }
        if let Some(color) = style.foreground.as_deref().and_then(terminal_color) {
            queue!(out, SetForegroundColor(color))?;
        }
        if let Some(color) = style.background.as_deref().and_then(terminal_color).or(self.background) {
            queue!(out, SetBackgroundColor(color))?;
        }
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if style.strikethrough {
            queue!(out, SetAttribute(Attribute::CrossedOut))?;
        }
        if style.border.is_some() {
            queue!(out, SetAttribute(Attribute::Framed))?;
        }
        queue!(out, Print(&span.text), ResetColor, SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

impl Default for Preview {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(line: usize, start: usize, end: usize) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    #[test]
    fn test_line_spans_split_on_style() {
        let red = DecorationStyle::fg("#ff0000");
        let ranges = [range(0, 4, 7)];
        let decorations = [(&red, &ranges[..])];

        let spans = line_spans("let red = 1;", 0, &decorations, 80);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "let ");
        assert_eq!(spans[1].text, "red");
        assert_eq!(spans[1].style, red);
        assert_eq!(spans[2].text, " = 1;");
        assert!(spans[2].style.is_default());
    }

    #[test]
    fn test_later_decorations_draw_on_top() {
        let comment = DecorationStyle::fg("#474747").with_strikethrough();
        let swatch = DecorationStyle::bg("#00ff00").with_fg("#ff00ff");
        let whole = [range(0, 0, 12)];
        let literal = [range(0, 3, 7)];
        let decorations = [(&comment, &whole[..]), (&swatch, &literal[..])];

        let spans = line_spans("// #0f0 ok", 0, &decorations, 80);
        assert_eq!(spans[1].text, "#0f0");
        assert_eq!(spans[1].style.foreground.as_deref(), Some("#ff00ff"));
        assert_eq!(spans[1].style.background.as_deref(), Some("#00ff00"));
        assert!(spans[1].style.strikethrough);
    }

    #[test]
    fn test_line_spans_clip_wide_chars() {
        let spans = line_spans("日本語テキスト", 0, &[], 5);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "日本");
    }

    #[test]
    fn test_render_writes_colors_and_gutter() {
        let document = TextDocument::new("rust", "// TODO x\nfn main() {}");
        let todo = DecorationStyle::fg("#ff8c00").with_bold();
        let ranges = [range(0, 0, 9)];
        let decorations = [(&todo, &ranges[..])];

        let mut out = Vec::new();
        Preview::with_width(40)
            .render(&mut out, &document, &decorations)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("38;2;255;140;0"));
        assert!(text.contains("  1 "));
        assert!(text.contains("  2 "));
        assert!(text.contains("fn main() {}"));
        assert_eq!(text.matches('\n').count(), 2);
    }

    #[test]
    fn test_render_without_gutter() {
        let document = TextDocument::new("plaintext", "abc");
        let mut out = Vec::new();
        Preview::with_width(10)
            .line_numbers(false)
            .background(Some("not a color"))
            .render(&mut out, &document, &[])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("abc"));
        assert!(!text.contains("  1 "));
    }
}
