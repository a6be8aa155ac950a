use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use shelter_asset::Resources;

use crate::{
    render::{SoftwareRenderSystem, SpriteHandle},
    text::FontManager,
    widget::{Cached, Label},
    window::{make_window, AppLoop},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The drawing tool itself: a window showing a greeting in a bitmap font.
pub struct Shelter {
    title: String,
    size: (u32, u32),
    fonts_path: PathBuf,
    font_name: String,
    greeting: String,
}

impl Default for Shelter {
    fn default() -> Self {
        Self {
            title: "Shelter".into(),
            size: (800, 600),
            fonts_path: PathBuf::from("res/fonts"),
            font_name: Self::DEFAULT_FONT_NAME.into(),
            greeting: "Shelter v0.1\nThis is a test".into(),
        }
    }
}

impl Shelter {
    pub const DEFAULT_FONT_NAME: &'static str = "topaz8x16";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_fonts_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.fonts_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_font(mut self, name: &str) -> Self {
        self.font_name = name.into();
        self
    }

    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn fonts_path(&self) -> &Path {
        &self.fonts_path
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Loads the font, lays out the greeting and builds everything a frame needs.
    pub fn build(&self) -> Result<Scene> {
        let mut fonts = FontManager::new(Resources::new(&self.fonts_path));
        let font = fonts.create(&self.font_name).with_context(|| {
            format!(
                "couldn't load the bitmap font, is '{}' in {}?",
                self.font_name,
                self.fonts_path.display()
            )
        })?;

        let mut greeting = Cached::new(Label::new(font, &self.greeting));
        let (width, height) = self.size;
        let mut render = SoftwareRenderSystem::new(width, height)?;
        let greeting_sprite = render.add(greeting.render()?.clone());

        Ok(Scene {
            render,
            greeting,
            greeting_sprite,
        })
    }

    pub fn run(self) -> Result<()> {
        info!("starting shelter {}", VERSION);
        let scene = self.build()?;

        let (width, height) = self.size;
        make_window()
            .with_title(&self.title)
            .with_size(width, height)
            .run(scene)
    }
}

/// What ends up on screen.
pub struct Scene {
    render: SoftwareRenderSystem,
    greeting: Cached<Label>,
    greeting_sprite: SpriteHandle,
}

impl Scene {
    pub fn render(&self) -> &SoftwareRenderSystem {
        &self.render
    }

    pub fn greeting(&self) -> &str {
        self.greeting.widget().text()
    }

    /// Changes the greeting, it's redrawn on the next frame.
    pub fn set_greeting(&mut self, text: &str) {
        self.greeting.widget_mut().set_text(text);
    }

    // swaps in a new greeting sprite when the label went dirty
    fn refresh(&mut self) -> Result<()> {
        if self.greeting.is_dirty() {
            let sprite = self.greeting.render()?.clone();
            if let Some(slot) = self.render.get_mut(self.greeting_sprite) {
                *slot = sprite;
            }
        }
        Ok(())
    }
}

impl AppLoop for Scene {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.render.resize(width, height)?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut [u32]) {
        if let Err(err) = self.refresh() {
            error!("couldn't redraw the greeting: {:#}", err);
        }
        self.render.draw();
        let (width, height) = self.render.framebuffer().size();
        if frame.len() != width as usize * height as usize {
            warn!(
                "frame holds {} pixels but the framebuffer is {}x{}",
                frame.len(),
                width,
                height
            );
        }
        self.render.present(frame);
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    #[test]
    fn defaults() {
        let shelter = Shelter::new();
        assert_eq!(shelter.font_name(), "topaz8x16");
        assert_eq!(shelter.fonts_path(), Path::new("res/fonts"));
        assert_eq!(shelter.greeting, "Shelter v0.1\nThis is a test");
    }

    #[test]
    fn build_fails_without_font() {
        let dir = tempfile::tempdir().unwrap();
        let err = Shelter::new()
            .with_fonts_path(dir.path())
            .build()
            .err()
            .unwrap();

        assert!(format!("{:#}", err).contains("topaz8x16"));
    }

    #[test]
    fn scene_draws_greeting() {
        let dir = tempfile::tempdir().unwrap();
        GrayImage::from_pixel(128, 256, Luma([255]))
            .save(dir.path().join("plain.png"))
            .unwrap();

        let mut scene = Shelter::new()
            .with_size(32, 32)
            .with_fonts_path(dir.path())
            .with_font("plain")
            .with_greeting("hi")
            .build()
            .unwrap();

        let mut frame = vec![0u32; 32 * 32];
        scene.draw(&mut frame);

        // "hi" covers the top-left 16x16, the rest is the clear color
        assert_eq!(frame[0], 0x00ff_ffff);
        assert_eq!(frame[15 * 32 + 15], 0x00ff_ffff);
        assert_eq!(frame[16], 0);
        assert_eq!(frame[16 * 32], 0);

        scene.set_greeting("a\nb");
        scene.draw(&mut frame);

        assert_eq!(scene.greeting(), "a\nb");
        assert_eq!(frame[8], 0);
        assert_eq!(frame[16 * 32], 0x00ff_ffff);
    }
}
