use log::debug;

use crate::{
    sprite::{AsSurfaceMut, SoftwareSprite},
    surface::{PixelFormat, Rect, Surface},
};

use super::{CellSize, FontError, GlyphTable};

/// Maps characters to glyph cells on a sheet image.
///
/// The sheet is expected to hold every ASCII (and extended) character in order,
/// all of the same size. Text is laid out monospaced: every character advances by
/// exactly one cell, and lines are separated by `'\n'`.
#[derive(Debug)]
pub struct BitmapFont {
    sheet: Surface,
    table: GlyphTable,
}

// a glyph ready to be blitted, relative to the text's top-left corner
struct PlacedGlyph {
    cell: Rect,
    x: i64,
    y: i64,
}

struct TextLayout {
    glyphs: Vec<PlacedGlyph>,
    width: u32,
    height: u32,
}

impl BitmapFont {
    pub const DEFAULT_CELL_SIZE: CellSize = CellSize::new(8, 16);

    pub fn new(sheet: Surface, cell_size: CellSize) -> Result<Self, FontError> {
        let table = GlyphTable::new(sheet.width(), sheet.height(), cell_size)?;
        Ok(Self { sheet, table })
    }

    pub fn cell_size(&self) -> CellSize {
        self.table.cell_size()
    }

    pub fn sheet(&self) -> &Surface {
        &self.sheet
    }

    pub fn glyph_table(&self) -> &GlyphTable {
        &self.table
    }

    /// Size of the box `text` would cover, without checking its characters.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let CellSize { width, height } = self.cell_size();
        let (columns, lines) = text
            .split('\n')
            .fold((0usize, 0usize), |(columns, lines), line| {
                (columns.max(line.chars().count()), lines + 1)
            });

        (
            saturating_cells(columns, width),
            saturating_cells(lines, height),
        )
    }

    fn layout(&self, text: &str) -> Result<TextLayout, FontError> {
        let CellSize {
            width: cw,
            height: ch,
        } = self.cell_size();

        let mut glyphs = Vec::with_capacity(text.len());
        for (i, line) in text.split('\n').enumerate() {
            for (j, character) in line.chars().enumerate() {
                glyphs.push(PlacedGlyph {
                    cell: self.table.glyph(character)?,
                    x: j as i64 * i64::from(cw),
                    y: i as i64 * i64::from(ch),
                });
            }
        }

        let (width, height) = self.measure(text);
        Ok(TextLayout {
            glyphs,
            width,
            height,
        })
    }

    fn blit_layout(&self, layout: &TextLayout, target: &mut Surface, offset: (i32, i32)) {
        for glyph in &layout.glyphs {
            let x = clamp_i32(i64::from(offset.0) + glyph.x);
            let y = clamp_i32(i64::from(offset.1) + glyph.y);
            self.sheet.blit(glyph.cell, target, (x, y));
        }
    }

    /// Renders `text` on a new sprite in the sheet's own pixel format.
    pub fn render(&self, text: &str) -> Result<SoftwareSprite, FontError> {
        self.render_with_format(text, self.sheet.format())
    }

    /// Renders `text` on a new sprite with the given pixel format.
    pub fn render_with_format(
        &self,
        text: &str,
        format: PixelFormat,
    ) -> Result<SoftwareSprite, FontError> {
        let layout = self.layout(text)?;
        let mut surface = Surface::new(layout.width, layout.height, format)?;
        self.blit_layout(&layout, &mut surface, (0, 0));

        debug!(
            "rendered {} glyphs on a {}x{} {:?} canvas",
            layout.glyphs.len(),
            layout.width,
            layout.height,
            format
        );
        Ok(SoftwareSprite::new(surface))
    }

    /// Renders `text` onto an existing surface, its top-left corner at `offset`.
    ///
    /// Returns the area the text covers. Nothing outside it is written, and nothing
    /// at all is written when `text` holds a character without a glyph.
    pub fn render_onto<T: AsSurfaceMut + ?Sized>(
        &self,
        target: &mut T,
        text: &str,
        offset: (i32, i32),
    ) -> Result<Rect, FontError> {
        let target = target
            .as_surface_mut()
            .ok_or(FontError::UnsupportedSurfaceType)?;
        let layout = self.layout(text)?;
        self.blit_layout(&layout, target, offset);

        Ok(Rect::new(offset.0, offset.1, layout.width, layout.height))
    }
}

fn saturating_cells(count: usize, cell: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(cell)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
