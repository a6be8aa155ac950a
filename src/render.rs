use generational_arena::{Arena, Index};
use log::debug;

use crate::{
    sprite::SoftwareSprite,
    surface::{PixelFormat, Surface, SurfaceError},
};

#[derive(Eq, Hash, PartialEq, Clone, Copy, Debug)]
pub struct SpriteHandle(pub Index);

// renderer composites sprites into a framebuffer on the cpu
pub struct SoftwareRenderSystem {
    framebuffer: Surface,
    sprites: Arena<SoftwareSprite>,
    // draw order, arena iteration order isn't insertion order once slots get reused
    order: Vec<SpriteHandle>,
    pub clear_color: [u8; 4],
}

impl SoftwareRenderSystem {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Ok(Self {
            framebuffer: Surface::new(width, height, PixelFormat::Rgba8)?,
            sprites: Arena::new(),
            order: Vec::new(),
            clear_color: [0, 0, 0, 255],
        })
    }

    pub fn with_clear_color(mut self, clear_color: [u8; 4]) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if self.framebuffer.size() != (width, height) {
            debug!("resizing framebuffer to {}x{}", width, height);
            self.framebuffer = Surface::new(width, height, PixelFormat::Rgba8)?;
        }
        Ok(())
    }

    pub fn framebuffer(&self) -> &Surface {
        &self.framebuffer
    }

    pub fn add(&mut self, sprite: SoftwareSprite) -> SpriteHandle {
        let handle = SpriteHandle(self.sprites.insert(sprite));
        self.order.push(handle);
        handle
    }

    pub fn remove(&mut self, handle: SpriteHandle) -> Option<SoftwareSprite> {
        let sprite = self.sprites.remove(handle.0)?;
        self.order.retain(|h| *h != handle);
        Some(sprite)
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&SoftwareSprite> {
        self.sprites.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: SpriteHandle) -> Option<&mut SoftwareSprite> {
        self.sprites.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Clears the framebuffer and blits every sprite, oldest first.
    pub fn draw(&mut self) {
        self.framebuffer.fill(self.clear_color);
        for handle in &self.order {
            if let Some(sprite) = self.sprites.get(handle.0) {
                let surface = sprite.surface();
                surface.blit(surface.rect(), &mut self.framebuffer, sprite.position);
            }
        }
    }

    /// Writes the framebuffer as `0RGB` words, row by row.
    ///
    /// `out` may be shorter or longer than the framebuffer, extra words are left alone.
    pub fn present(&self, out: &mut [u32]) {
        for (word, px) in out
            .iter_mut()
            .zip(self.framebuffer.data().chunks_exact(4))
        {
            *word = u32::from(px[0]) << 16 | u32::from(px[1]) << 8 | u32::from(px[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> SoftwareSprite {
        let mut surface = Surface::new(width, height, PixelFormat::Rgba8).unwrap();
        surface.fill(rgba);
        SoftwareSprite::new(surface)
    }

    #[test]
    fn draw_clears_then_blits_in_order() {
        let mut render = SoftwareRenderSystem::new(4, 4)
            .unwrap()
            .with_clear_color([1, 1, 1, 255]);
        render.add(solid(2, 2, [255, 0, 0, 255]));
        render.add(solid(2, 2, [0, 255, 0, 255]).with_position(1, 1));

        render.draw();

        let fb = render.framebuffer();
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(1, 1), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(3, 3), Some([1, 1, 1, 255]));
    }

    #[test]
    fn removed_sprites_are_not_drawn() {
        let mut render = SoftwareRenderSystem::new(2, 2).unwrap();
        let handle = render.add(solid(2, 2, [9, 9, 9, 255]));

        assert!(render.remove(handle).is_some());
        assert!(render.remove(handle).is_none());
        render.draw();

        assert!(render.is_empty());
        assert_eq!(render.framebuffer().pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn moved_sprite_is_drawn_at_new_position() {
        let mut render = SoftwareRenderSystem::new(4, 1).unwrap();
        let handle = render.add(solid(1, 1, [5, 5, 5, 255]));
        render.get_mut(handle).unwrap().position = (3, 0);

        render.draw();

        assert_eq!(render.framebuffer().pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(render.framebuffer().pixel(3, 0), Some([5, 5, 5, 255]));
    }

    #[test]
    fn present_packs_0rgb() {
        let mut render = SoftwareRenderSystem::new(2, 1)
            .unwrap()
            .with_clear_color([0x12, 0x34, 0x56, 0x78]);
        render.draw();

        let mut out = [0u32; 3];
        render.present(&mut out);

        assert_eq!(out, [0x0012_3456, 0x0012_3456, 0]);
    }

    #[test]
    fn resize_reallocates() {
        let mut render = SoftwareRenderSystem::new(2, 2).unwrap();
        render.resize(800, 600).unwrap();
        assert_eq!(render.framebuffer().size(), (800, 600));
    }
}
