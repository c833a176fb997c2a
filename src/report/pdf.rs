//! Single-page report layout rendered through `printpdf`.
//!
//! Text is placed top-down on an A4 page in millimetres using the built-in
//! Helvetica faces, so no font files are embedded.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use thiserror::Error;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const PT_TO_MM: f32 = 25.4 / 72.0;
// Helvetica averages about half an em per glyph.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("failed to render PDF: {0}")]
    Render(String),
}

impl From<printpdf::Error> for ReportError {
    fn from(err: printpdf::Error) -> Self {
        ReportError::Render(format!("{err:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn builtin(self) -> BuiltinFont {
        match self {
            Font::Regular => BuiltinFont::Helvetica,
            Font::Bold => BuiltinFont::HelveticaBold,
            Font::Italic => BuiltinFont::HelveticaOblique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One run of text; `x` and `baseline` are millimetres from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub font: Font,
    pub size: f32,
    pub x: f32,
    pub baseline: f32,
    pub text: String,
}

/// Builds the page top-down; each call advances the cursor.
#[derive(Debug, Clone)]
pub struct PdfPage {
    placed: Vec<PlacedText>,
    cursor_from_top: f32,
}

impl Default for PdfPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfPage {
    pub fn new() -> Self {
        Self {
            placed: Vec::new(),
            cursor_from_top: MARGIN_MM,
        }
    }

    /// One line of text of `size` points occupying `line_height` millimetres.
    pub fn line(&mut self, font: Font, size: f32, line_height: f32, align: Align, text: &str) {
        let size_mm = size * PT_TO_MM;
        let baseline_from_top = self.cursor_from_top + line_height / 2.0 + size_mm * 0.3;
        let x = match align {
            Align::Left => MARGIN_MM,
            Align::Center => {
                let width = text.chars().count() as f32 * size_mm * AVG_GLYPH_WIDTH;
                ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
            }
        };
        self.placed.push(PlacedText {
            font,
            size,
            x,
            baseline: PAGE_HEIGHT_MM - baseline_from_top,
            text: text.to_string(),
        });
        self.cursor_from_top += line_height;
    }

    /// Word-wrapped paragraph across the printable width.
    pub fn paragraph(&mut self, font: Font, size: f32, line_height: f32, text: &str) {
        let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let max_chars = ((usable / (size * PT_TO_MM * AVG_GLYPH_WIDTH)) as usize).max(1);
        for line in wrap(text, max_chars) {
            self.line(font, size, line_height, Align::Left, &line);
        }
    }

    /// Move the cursor down without drawing.
    pub fn gap(&mut self, height: f32) {
        self.cursor_from_top += height;
    }

    pub fn placed(&self) -> &[PlacedText] {
        &self.placed
    }

    /// Render the page as a complete PDF file.
    pub fn finish(self, title: &str) -> Result<Vec<u8>, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Report");
        let regular = doc.add_builtin_font(Font::Regular.builtin())?;
        let bold = doc.add_builtin_font(Font::Bold.builtin())?;
        let italic = doc.add_builtin_font(Font::Italic.builtin())?;

        {
            let layer = doc.get_page(page).get_layer(layer);
            for item in &self.placed {
                let font: &IndirectFontRef = match item.font {
                    Font::Regular => &regular,
                    Font::Bold => &bold,
                    Font::Italic => &italic,
                };
                layer.use_text(item.text.as_str(), item.size, Mm(item.x), Mm(item.baseline), font);
            }
        }

        Ok(doc.save_to_bytes()?)
    }
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
