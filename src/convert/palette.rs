//! Glyph palettes, ordered from the glyph used for dark cells to the one
//! used for bright cells.

use crate::error::ConvertError;

/// Short, low-detail ramp (8 levels).
pub const BASIC_CHARSET: &str = ".,:;!*#@";

/// Long, high-detail ramp (70 levels).
/// Every glyph is distinct.
pub const EXTENDED_CHARSET: &str =
    " .'\"^`,:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// An ordered, non-empty sequence of glyphs.
///
/// Index 0 is selected for luminance 0, the last glyph for luminance 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    /// The built-in basic palette.
    pub fn basic() -> Self {
        Self {
            glyphs: BASIC_CHARSET.chars().collect(),
        }
    }

    /// The built-in extended palette.
    pub fn extended() -> Self {
        Self {
            glyphs: EXTENDED_CHARSET.chars().collect(),
        }
    }

    /// Build a palette from caller-supplied glyphs.
    ///
    /// The glyphs are used exactly as given (including any spaces) but the
    /// palette is rejected when it is empty or contains only whitespace.
    pub fn custom(glyphs: &str) -> Result<Self, ConvertError> {
        if glyphs.trim().is_empty() {
            return Err(ConvertError::validation(
                "Custom character set cannot be empty",
            ));
        }
        Ok(Self {
            glyphs: glyphs.chars().collect(),
        })
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the palette has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, saturating at the brightest glyph.
    pub fn glyph(&self, index: usize) -> char {
        let last = self.glyphs.len() - 1;
        self.glyphs[index.min(last)]
    }

    pub fn as_string(&self) -> String {
        self.glyphs.iter().collect()
    }
}
