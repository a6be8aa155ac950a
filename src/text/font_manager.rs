use std::{collections::HashMap, rc::Rc};

use log::{debug, info};
use shelter_asset::{ResolvePath, Resources};

use crate::surface::Surface;

use super::{BitmapFont, CellSize, FontError};

// one font per name, loaded on first use and kept until the manager goes away.
// fonts are handed out as Rc, so the manager stays on the thread that made it
pub struct FontManager<R = Resources> {
    resolver: R,
    cell_size: CellSize,
    extension: String,
    fonts: HashMap<String, Rc<BitmapFont>>,
}

impl<R: ResolvePath> FontManager<R> {
    pub const DEFAULT_EXTENSION: &'static str = "png";

    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            cell_size: BitmapFont::DEFAULT_CELL_SIZE,
            extension: Self::DEFAULT_EXTENSION.into(),
            fonts: HashMap::new(),
        }
    }

    pub fn with_cell_size(mut self, cell_size: CellSize) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').into();
        self
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Returns the font called `name`, loading its sheet the first time round.
    ///
    /// Failed loads aren't remembered, so asking again retries from scratch.
    pub fn create(&mut self, name: &str) -> Result<Rc<BitmapFont>, FontError> {
        if let Some(font) = self.fonts.get(name) {
            debug!("font '{}' already loaded", name);
            return Ok(font.clone());
        }

        let font = Rc::new(self.load(name)?);
        self.fonts.insert(name.to_string(), font.clone());
        info!(
            "loaded font '{}' ({}x{} cells)",
            name, self.cell_size.width, self.cell_size.height
        );

        Ok(font)
    }

    pub fn get(&self, name: &str) -> Option<Rc<BitmapFont>> {
        self.fonts.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn file_name(&self, name: &str) -> String {
        if self.extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.extension)
        }
    }

    fn load(&self, name: &str) -> Result<BitmapFont, FontError> {
        let load_failed =
            |source: Box<dyn std::error::Error + Send + Sync>| FontError::FontLoadFailed {
                name: name.to_string(),
                source,
            };

        let path = self
            .resolver
            .resolve(&self.file_name(name))
            .map_err(|err| load_failed(err.into()))?;
        debug!("decoding font sheet {}", path.display());
        let sheet = Surface::from_path(&path).map_err(|err| load_failed(Box::new(err)))?;

        BitmapFont::new(sheet, self.cell_size).map_err(|err| load_failed(Box::new(err)))
    }
}
