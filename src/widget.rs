use std::rc::Rc;

use anyhow::Result;

use crate::{sprite::SoftwareSprite, text::BitmapFont};

pub trait Widget {
    /// Builds a fresh sprite for the widget's current state.
    fn draw(&mut self) -> Result<SoftwareSprite>;
}

/// Keeps the last sprite a widget drew and only redraws after [`Cached::mark_dirty`].
pub struct Cached<W> {
    widget: W,
    sprite: Option<SoftwareSprite>,
}

impl<W: Widget> Cached<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            sprite: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.sprite.is_none()
    }

    pub fn mark_dirty(&mut self) {
        self.sprite = None;
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Gives mutable access to the widget and marks it dirty.
    pub fn widget_mut(&mut self) -> &mut W {
        self.mark_dirty();
        &mut self.widget
    }

    pub fn render(&mut self) -> Result<&SoftwareSprite> {
        let sprite = match self.sprite.take() {
            Some(sprite) => sprite,
            None => self.widget.draw()?,
        };
        let sprite: &SoftwareSprite = self.sprite.insert(sprite);
        Ok(sprite)
    }
}

/// Text drawn with a bitmap font.
pub struct Label {
    font: Rc<BitmapFont>,
    text: String,
    position: (i32, i32),
}

impl Label {
    pub fn new(font: Rc<BitmapFont>, text: &str) -> Self {
        Self {
            font,
            text: text.to_string(),
            position: (0, 0),
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

impl Widget for Label {
    fn draw(&mut self) -> Result<SoftwareSprite> {
        let sprite = self.font.render(&self.text)?;
        Ok(sprite.with_position(self.position.0, self.position.1))
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GrayImage};

    use crate::surface::Surface;

    use super::*;

    struct Counter {
        draws: usize,
    }

    impl Widget for Counter {
        fn draw(&mut self) -> Result<SoftwareSprite> {
            self.draws += 1;
            let surface = Surface::new(
                self.draws as u32,
                1,
                crate::surface::PixelFormat::Gray8,
            )?;
            Ok(SoftwareSprite::new(surface))
        }
    }

    fn blank_font() -> Rc<BitmapFont> {
        let sheet = Surface::from_image(DynamicImage::ImageLuma8(GrayImage::new(128, 256)));
        Rc::new(BitmapFont::new(sheet, BitmapFont::DEFAULT_CELL_SIZE).unwrap())
    }

    #[test]
    fn draws_once_until_dirty() {
        let mut cached = Cached::new(Counter { draws: 0 });
        assert!(cached.is_dirty());

        assert_eq!(cached.render().unwrap().size(), (1, 1));
        assert_eq!(cached.render().unwrap().size(), (1, 1));
        assert_eq!(cached.widget().draws, 1);
        assert!(!cached.is_dirty());

        cached.mark_dirty();
        assert_eq!(cached.render().unwrap().size(), (2, 1));
        assert_eq!(cached.widget().draws, 2);
    }

    #[test]
    fn failed_draw_stays_dirty() {
        let mut cached = Cached::new(Label::new(blank_font(), "→"));

        assert!(cached.render().is_err());
        assert!(cached.is_dirty());
    }

    #[test]
    fn label_redraws_after_text_change() {
        let mut label = Cached::new(Label::new(blank_font(), "hi").with_position(4, 2));

        let sprite = label.render().unwrap();
        assert_eq!(sprite.size(), (16, 16));
        assert_eq!(sprite.position, (4, 2));

        label.widget_mut().set_text("hello\nworld");
        assert_eq!(label.render().unwrap().size(), (40, 32));
        assert_eq!(label.widget().text(), "hello\nworld");
    }
}
