use itertools::Itertools;

use crate::surface::Rect;

use super::FontError;

/// Number of glyphs on every sheet, one per code point in `0..=255`.
pub const GLYPH_COUNT: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Where every glyph lives on a sheet, indexed by code point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphTable {
    cells: Box<[Rect; GLYPH_COUNT]>,
    cell_size: CellSize,
}

impl GlyphTable {
    /// Slices a `width`x`height` sheet into cells, left to right then top to bottom.
    ///
    /// The sheet has to hold exactly [`GLYPH_COUNT`] cells worth of pixels, and the
    /// grid it tiles into has to come out at exactly that many cells too.
    pub fn new(width: u32, height: u32, cell_size: CellSize) -> Result<Self, FontError> {
        let CellSize {
            width: cw,
            height: ch,
        } = cell_size;

        let malformed = || FontError::MalformedFontSheet {
            width,
            height,
            cell_width: cw,
            cell_height: ch,
        };

        let pixels = u64::from(width) * u64::from(height);
        let cell_pixels = u64::from(cw) * u64::from(ch);
        if cell_pixels == 0 || pixels != GLYPH_COUNT as u64 * cell_pixels {
            return Err(malformed());
        }

        let chars_in_row = width / cw;
        let rows = height / ch;

        // cell origins have to fit the signed coordinates blits work with
        let origin =
            |index: u32, size: u32| i32::try_from(index * size).map_err(|_| malformed());
        let cells = (0..rows)
            .cartesian_product(0..chars_in_row)
            .map(|(row, col)| Ok(Rect::new(origin(col, cw)?, origin(row, ch)?, cw, ch)))
            .collect::<Result<Vec<_>, FontError>>()?;

        let actual = cells.len();
        let cells =
            <Box<[Rect; GLYPH_COUNT]>>::try_from(cells.into_boxed_slice()).map_err(|_| {
                FontError::GlyphTableSizeMismatch {
                    expected: GLYPH_COUNT,
                    actual,
                }
            })?;

        Ok(Self { cells, cell_size })
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    pub fn cells(&self) -> &[Rect] {
        self.cells.as_slice()
    }

    pub fn get(&self, code_point: u32) -> Option<Rect> {
        self.cells.get(code_point as usize).copied()
    }

    pub fn glyph(&self, character: char) -> Result<Rect, FontError> {
        self.get(u32::from(character))
            .ok_or(FontError::UnsupportedGlyph(character))
    }
}
