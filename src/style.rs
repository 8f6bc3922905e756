//! Decoration style descriptors
//!
//! A `DecorationStyle` describes how a set of ranges should look. Colors are
//! kept as strings (usually `#rrggbb`) and interpreted by the rendering host.

/// Border drawn around decorated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    pub color: String,
    pub style: String,
    pub width: String,
    pub radius: String,
}

/// Text decoration style attributes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationStyle {
    /// Foreground (text) color
    pub foreground: Option<String>,
    /// Background color
    pub background: Option<String>,
    /// Optional border
    pub border: Option<Border>,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Struck-through text
    pub strikethrough: bool,
}

impl DecorationStyle {
    /// Create a style with just a foreground color
    pub fn fg(color: impl Into<String>) -> Self {
        Self {
            foreground: Some(color.into()),
            ..Default::default()
        }
    }

    /// Create a style with just a background color
    pub fn bg(color: impl Into<String>) -> Self {
        Self {
            background: Some(color.into()),
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: impl Into<String>) -> Self {
        self.foreground = Some(color.into());
        self
    }

    /// Builder: set border
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Builder: set strikethrough
    pub fn with_strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = DecorationStyle::default();
        assert!(style.is_default());
        assert_eq!(style.foreground, None);
        assert!(!style.bold);
    }

    #[test]
    fn test_style_builders() {
        let style = DecorationStyle::bg("#ff0000")
            .with_fg("#00ffff")
            .with_bold()
            .with_strikethrough();
        assert_eq!(style.background.as_deref(), Some("#ff0000"));
        assert_eq!(style.foreground.as_deref(), Some("#00ffff"));
        assert!(style.bold);
        assert!(style.strikethrough);
        assert!(!style.italic);
        assert!(!style.is_default());
    }
}
