use std::path::Path;

use image::{DynamicImage, ImageResult, Rgba, RgbaImage};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn bits_per_pixel(self) -> u32 {
        self.bytes_per_pixel() as u32 * 8
    }

    fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Gray8 => [px[0], px[0], px[0], 255],
            PixelFormat::Rgb8 => [px[0], px[1], px[2], 255],
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
        }
    }

    fn write_rgba(self, rgba: [u8; 4], out: &mut [u8]) {
        match self {
            PixelFormat::Gray8 => {
                let [r, g, b, _] = rgba.map(u32::from);
                out[0] = ((r * 299 + g * 587 + b * 114) / 1000) as u8;
            }
            PixelFormat::Rgb8 => out.copy_from_slice(&rgba[..3]),
            PixelFormat::Rgba8 => out.copy_from_slice(&rgba),
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        x >= i64::from(self.x)
            && y >= i64::from(self.y)
            && x < i64::from(self.x) + i64::from(self.w)
            && y < i64::from(self.y) + i64::from(self.h)
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("couldn't allocate a {width}x{height} {format:?} surface")]
    AllocationFailed {
        width: u32,
        height: u32,
        format: PixelFormat,
    },
}

/// A CPU-side pixel buffer, rows packed top to bottom without padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Surface {
    /// Allocates a zeroed surface.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, SurfaceError> {
        let failed = || SurfaceError::AllocationFailed {
            width,
            height,
            format,
        };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(failed)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| failed())?;
        data.resize(len, 0);

        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (format, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::Gray8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, buf.into_raw()),
            other => (PixelFormat::Rgba8, other.into_rgba8().into_raw()),
        };

        Self {
            data,
            width,
            height,
            format,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        Ok(Self::from_image(image::open(path)?))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel()
    }

    fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = self.offset(x, y);
        self.format
            .to_rgba(&self.data[offset..offset + self.format.bytes_per_pixel()])
    }

    /// Pixel at `(x, y)` widened to RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.rgba_at(x, y))
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = self.offset(x, y);
        self.format
            .write_rgba(rgba, &mut self.data[offset..offset + bpp]);
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        let bpp = self.format.bytes_per_pixel();
        let mut px = [0u8; 4];
        self.format.write_rgba(rgba, &mut px[..bpp]);
        for chunk in self.data.chunks_exact_mut(bpp) {
            chunk.copy_from_slice(&px[..bpp]);
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.rgba_at(x, y)))
    }

    /// Copies `src_rect` of this surface onto `dst` with its top-left corner at
    /// `dst_pos`, converting pixel formats when they differ.
    ///
    /// Both rectangles are clipped to their surfaces. Returns the region of `dst`
    /// that was written, which is empty when nothing overlapped.
    pub fn blit(&self, src_rect: Rect, dst: &mut Surface, dst_pos: (i32, i32)) -> Rect {
        let mut sx = i64::from(src_rect.x).max(0);
        let mut sy = i64::from(src_rect.y).max(0);
        let sx_end = (i64::from(src_rect.x) + i64::from(src_rect.w)).min(i64::from(self.width));
        let sy_end = (i64::from(src_rect.y) + i64::from(src_rect.h)).min(i64::from(self.height));

        let mut dx = i64::from(dst_pos.0) + (sx - i64::from(src_rect.x));
        let mut dy = i64::from(dst_pos.1) + (sy - i64::from(src_rect.y));
        if dx < 0 {
            sx -= dx;
            dx = 0;
        }
        if dy < 0 {
            sy -= dy;
            dy = 0;
        }

        let w = (sx_end - sx).min(i64::from(dst.width) - dx);
        let h = (sy_end - sy).min(i64::from(dst.height) - dy);
        if w <= 0 || h <= 0 {
            return Rect::default();
        }

        // every value is now inside both surfaces
        let (sx, sy, dx, dy, w, h) = (
            sx as u32, sy as u32, dx as u32, dy as u32, w as u32, h as u32,
        );
        let src_bpp = self.format.bytes_per_pixel();
        let dst_bpp = dst.format.bytes_per_pixel();

        for row in 0..h {
            let src_start = self.offset(sx, sy + row);
            let dst_start = dst.offset(dx, dy + row);
            let src_row = &self.data[src_start..src_start + w as usize * src_bpp];
            let dst_row = &mut dst.data[dst_start..dst_start + w as usize * dst_bpp];

            if self.format == dst.format {
                dst_row.copy_from_slice(src_row);
            } else {
                for (src_px, dst_px) in src_row
                    .chunks_exact(src_bpp)
                    .zip(dst_row.chunks_exact_mut(dst_bpp))
                {
                    dst.format.write_rgba(self.format.to_rgba(src_px), dst_px);
                }
            }
        }

        Rect::new(dx as i32, dy as i32, w, h)
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    fn checker(width: u32, height: u32) -> Surface {
        let mut surface = Surface::new(width, height, PixelFormat::Rgba8).unwrap();
        for y in 0..height {
            for x in 0..width {
                surface.put_pixel(x, y, [x as u8, y as u8, 7, 255]);
            }
        }
        surface
    }

    #[test]
    fn new_surface_is_zeroed() {
        let surface = Surface::new(3, 2, PixelFormat::Rgb8).unwrap();
        assert_eq!(surface.data().len(), 18);
        assert!(surface.data().iter().all(|b| *b == 0));
        assert_eq!(surface.format().bits_per_pixel(), 24);
    }

    #[test]
    fn zero_width_surface_is_allowed() {
        let surface = Surface::new(0, 16, PixelFormat::Gray8).unwrap();
        assert_eq!(surface.size(), (0, 16));
        assert!(surface.data().is_empty());
    }

    #[test]
    fn oversized_allocation_fails() {
        let result = Surface::new(u32::MAX, u32::MAX, PixelFormat::Rgba8);
        assert!(matches!(
            result,
            Err(SurfaceError::AllocationFailed { .. })
        ));
    }

    #[test]
    fn from_image_keeps_gray_pixels() {
        let img = GrayImage::from_fn(4, 2, |x, _| Luma([x as u8 * 10]));
        let surface = Surface::from_image(DynamicImage::ImageLuma8(img));

        assert_eq!(surface.format(), PixelFormat::Gray8);
        assert_eq!(surface.pixel(3, 1), Some([30, 30, 30, 255]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn blit_copies_region() {
        let src = checker(8, 8);
        let mut dst = Surface::new(4, 4, PixelFormat::Rgba8).unwrap();

        let touched = src.blit(Rect::new(2, 3, 2, 2), &mut dst, (1, 1));

        assert_eq!(touched, Rect::new(1, 1, 2, 2));
        assert_eq!(dst.pixel(1, 1), Some([2, 3, 7, 255]));
        assert_eq!(dst.pixel(2, 2), Some([3, 4, 7, 255]));
        assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(dst.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blit_clips_negative_destination() {
        let src = checker(4, 4);
        let mut dst = Surface::new(4, 4, PixelFormat::Rgba8).unwrap();

        let touched = src.blit(src.rect(), &mut dst, (-2, -1));

        assert_eq!(touched, Rect::new(0, 0, 2, 3));
        assert_eq!(dst.pixel(0, 0), Some([2, 1, 7, 255]));
        assert_eq!(dst.pixel(2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blit_outside_destination_touches_nothing() {
        let src = checker(4, 4);
        let mut dst = Surface::new(4, 4, PixelFormat::Rgba8).unwrap();

        assert!(src.blit(src.rect(), &mut dst, (10, 0)).is_empty());
        assert!(dst.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn blit_converts_formats() {
        let mut src = Surface::new(1, 1, PixelFormat::Rgba8).unwrap();
        src.put_pixel(0, 0, [255, 255, 255, 128]);
        let mut gray = Surface::new(1, 1, PixelFormat::Gray8).unwrap();
        let mut rgb = Surface::new(1, 1, PixelFormat::Rgb8).unwrap();

        src.blit(src.rect(), &mut gray, (0, 0));
        src.blit(src.rect(), &mut rgb, (0, 0));

        assert_eq!(gray.data(), &[255]);
        assert_eq!(rgb.data(), &[255, 255, 255]);
        assert_eq!(gray.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut surface = Surface::new(2, 2, PixelFormat::Rgb8).unwrap();
        surface.fill([1, 2, 3, 255]);
        assert_eq!(surface.data(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn rect_contains() {
        let rect = Rect::new(10, 20, 8, 16);
        assert!(rect.contains(10, 20));
        assert!(rect.contains(17, 35));
        assert!(!rect.contains(18, 20));
        assert!(!rect.contains(10, 36));
    }
}
