// bitmap fonts: a glyph sheet sliced into 256 equal cells, one per code point
// - glyph_table works out where each cell lives on the sheet
// - bitmap_font blits cells for a string onto a surface
// - font_manager loads sheets by name and keeps them around

pub mod bitmap_font;
pub mod font_manager;
pub mod glyph_table;

use thiserror::Error;

use crate::surface::SurfaceError;

pub use bitmap_font::BitmapFont;
pub use font_manager::FontManager;
pub use glyph_table::{CellSize, GlyphTable, GLYPH_COUNT};

#[derive(Debug, Error)]
pub enum FontError {
    #[error(
        "image surface for bitmap font is {width}x{height}, \
         but characters have {cell_width}x{cell_height}"
    )]
    MalformedFontSheet {
        width: u32,
        height: u32,
        cell_width: u32,
        cell_height: u32,
    },

    #[error("glyph table size mismatch: expected {expected} cells, got {actual}")]
    GlyphTableSizeMismatch { expected: usize, actual: usize },

    #[error("couldn't allocate a canvas for the text")]
    CanvasAllocationFailed(#[from] SurfaceError),

    #[error("no glyph for character {0:?}, only code points 0-255 are supported")]
    UnsupportedGlyph(char),

    #[error("render target doesn't expose a mutable pixel surface")]
    UnsupportedSurfaceType,

    #[error("couldn't load font '{name}'")]
    FontLoadFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
