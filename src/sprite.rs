use crate::surface::{Rect, Surface};

/// Anything that can hand out a CPU pixel surface to draw on.
pub trait AsSurfaceMut {
    /// `None` when the pixels aren't reachable from the CPU.
    fn as_surface_mut(&mut self) -> Option<&mut Surface>;
}

impl AsSurfaceMut for Surface {
    fn as_surface_mut(&mut self) -> Option<&mut Surface> {
        Some(self)
    }
}

/// A surface placed somewhere on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftwareSprite {
    pub position: (i32, i32),
    surface: Surface,
}

impl SoftwareSprite {
    pub fn new(surface: Surface) -> Self {
        Self {
            position: (0, 0),
            surface,
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn area(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(self.position.0, self.position.1, w, h)
    }
}

impl AsSurfaceMut for SoftwareSprite {
    fn as_surface_mut(&mut self) -> Option<&mut Surface> {
        Some(&mut self.surface)
    }
}

/// A sprite whose pixels were uploaded to a hardware renderer.
///
/// Only the handle and the size stay on this side, so there is nothing to blit onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureSprite {
    pub id: u32,
    pub position: (i32, i32),
    pub size: (u32, u32),
}

impl AsSurfaceMut for TextureSprite {
    fn as_surface_mut(&mut self) -> Option<&mut Surface> {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::surface::PixelFormat;

    use super::*;

    #[test]
    fn software_sprite_exposes_its_surface() {
        let surface = Surface::new(8, 16, PixelFormat::Rgba8).unwrap();
        let mut sprite = SoftwareSprite::new(surface).with_position(3, 4);

        assert_eq!(sprite.area(), Rect::new(3, 4, 8, 16));
        assert!(sprite.as_surface_mut().is_some());
    }

    #[test]
    fn texture_sprite_has_no_surface() {
        let mut sprite = TextureSprite {
            id: 1,
            position: (0, 0),
            size: (8, 16),
        };
        assert!(sprite.as_surface_mut().is_none());
    }
}
