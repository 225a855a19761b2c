//! The assembled glyph grid and its string renderings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::dimensions::GridSpec;
use super::render::{ColorMode, RenderCell};

/// Row-major grid of rendered cells, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    grid: GridSpec,
    color_mode: ColorMode,
    rows: Vec<Vec<RenderCell>>,
}

impl ConversionResult {
    /// Assemble a result from finished rows.
    ///
    /// Callers guarantee `rows.len() == grid.height` and every row has
    /// `grid.width` cells.
    pub(crate) fn new(grid: GridSpec, color_mode: ColorMode, rows: Vec<Vec<RenderCell>>) -> Self {
        debug_assert_eq!(rows.len(), grid.height as usize);
        Self {
            grid,
            color_mode,
            rows,
        }
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn rows(&self) -> &[Vec<RenderCell>] {
        &self.rows
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&RenderCell> {
        self.rows.get(y as usize)?.get(x as usize)
    }

    pub fn cells(&self) -> impl Iterator<Item = &RenderCell> {
        self.rows.iter().flatten()
    }

    /// Glyphs only, one line per row.
    pub fn to_plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML-style markup: annotated cells become
    /// `<span style="color:rgb(r,g,b)">g</span>`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for cell in row {
                match cell.color {
                    Some(c) => {
                        out.push_str(&format!(
                            "<span style=\"color:rgb({},{},{})\">",
                            c.r, c.g, c.b
                        ));
                        push_escaped(&mut out, cell.glyph);
                        out.push_str("</span>");
                    }
                    None => push_escaped(&mut out, cell.glyph),
                }
            }
        }
        out
    }

    /// Terminal rendering with 24-bit foreground colors.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let mut current = None;
            for cell in row {
                if cell.color != current {
                    match cell.color {
                        Some(c) => out.push_str(&format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b)),
                        None => out.push_str("\x1b[39m"),
                    }
                    current = cell.color;
                }
                out.push(cell.glyph);
            }
            out.push_str("\x1b[0m"); // Reset at end of every row
        }
        out
    }

    /// Hex SHA-256 over every cell, for comparing repeat conversions.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.grid.width.to_le_bytes());
        hasher.update(self.grid.height.to_le_bytes());
        let mut buf = [0u8; 4];
        for cell in self.cells() {
            hasher.update(cell.glyph.encode_utf8(&mut buf).as_bytes());
            match cell.color {
                Some(c) => hasher.update([1u8, c.r, c.g, c.b]),
                None => hasher.update([0u8]),
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn push_escaped(out: &mut String, glyph: char) {
    match glyph {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::render::Rgb;

    fn sample_result() -> ConversionResult {
        ConversionResult::new(
            GridSpec::new(2, 2),
            ColorMode::Color,
            vec![
                vec![
                    RenderCell::colored('@', Rgb::new(255, 0, 0)),
                    RenderCell::plain('.'),
                ],
                vec![RenderCell::plain('<'), RenderCell::plain('#')],
            ],
        )
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sample_result().to_plain_text(), "@.\n<#");
    }

    #[test]
    fn test_markup_wraps_and_escapes() {
        assert_eq!(
            sample_result().to_markup(),
            "<span style=\"color:rgb(255,0,0)\">@</span>.\n&lt;#"
        );
    }

    #[test]
    fn test_ansi_resets_each_row() {
        let ansi = sample_result().to_ansi();
        assert_eq!(ansi, "\x1b[38;2;255;0;0m@\x1b[39m.\x1b[0m\n<#\x1b[0m");
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let a = sample_result();
        assert_eq!(a.fingerprint(), sample_result().fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut rows = a.rows().to_vec();
        rows[1][1] = RenderCell::plain('%');
        let b = ConversionResult::new(a.grid(), a.color_mode(), rows);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_cell_lookup() {
        let r = sample_result();
        assert_eq!(r.cell(1, 1), Some(&RenderCell::plain('#')));
        assert_eq!(r.cell(2, 0), None);
    }
}
