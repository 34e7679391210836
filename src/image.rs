//! The `Image` type: a width/height pixel buffer in one [`PixelFormat`],
//! plus conversion between formats.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::ImageError;
use crate::format::{Palette, PixelFormat};
use crate::limits::Limits;
use crate::quantize::Octree;

/// An in-memory raster image: dimensions, pixel format, pixel bytes, and
/// (for indexed formats) a palette.
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
    palette: Option<Palette>,
}

impl Image {
    /// Build an image from raw, tightly-packed pixel data (no row padding).
    /// `pixels.len()` must equal `width * height * format.bytes_per_pixel()`.
    pub fn from_parts(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
        palette: Option<Palette>,
    ) -> Result<Self, ImageError> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(format.bytes_per_pixel());
        if pixels.len() != expected {
            return Err(ImageError::InvalidInput(alloc::format!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height} {format:?}",
                pixels.len()
            )));
        }
        if matches!(format, PixelFormat::RgbP8) && palette.is_none() {
            return Err(ImageError::InvalidInput(
                "indexed image requires a palette".into(),
            ));
        }
        Ok(Image {
            width,
            height,
            format,
            pixels,
            palette,
        })
    }

    /// Allocate a blank (zero-filled) image, checking `limits` first.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        limits: &Limits,
    ) -> Result<Self, ImageError> {
        limits.check(width, height)?;
        let bytes = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(format.bytes_per_pixel());
        limits.check_memory(bytes)?;
        let palette = if matches!(format, PixelFormat::RgbP8) {
            Some(Palette::default())
        } else {
            None
        };
        Ok(Image {
            width,
            height,
            format,
            pixels: vec![0u8; bytes],
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    fn rgb_at(&self, index: usize) -> (u8, u8, u8, u8) {
        let desc = self.format.descriptor();
        if !desc.is_direct_color {
            let idx = self.pixels[index];
            let [r, g, b] = self
                .palette
                .as_ref()
                .expect("indexed image always has a palette")
                .get(idx);
            return (r, g, b, 255);
        }
        let base = index * desc.bytes_per_pixel;
        let px = &self.pixels[base..base + desc.bytes_per_pixel];
        let r = px[desc.r_offset.unwrap()];
        let g = px[desc.g_offset.unwrap()];
        let b = px[desc.b_offset.unwrap()];
        let a = desc.a_offset.map_or(255, |o| px[o]);
        (r, g, b, a)
    }

    /// Convert to `target`, returning a new image. Supports:
    /// - identity (returns a clone)
    /// - direct color -> direct color (any pair)
    /// - indexed -> direct color (palette lookup)
    /// - direct color -> indexed (via octree quantization)
    ///
    /// Indexed -> indexed is not supported and returns
    /// [`ImageError::UnsupportedConversion`].
    pub fn convert(&self, target: PixelFormat) -> Result<Image, ImageError> {
        if target == self.format {
            return Ok(self.clone());
        }
        let src_desc = self.format.descriptor();
        let dst_desc = target.descriptor();

        if !src_desc.is_direct_color && !dst_desc.is_direct_color {
            return Err(ImageError::UnsupportedConversion {
                from: self.format,
                to: target,
            });
        }

        if dst_desc.is_direct_color {
            let n = self.width as usize * self.height as usize;
            let mut out = vec![0u8; n * dst_desc.bytes_per_pixel];
            for i in 0..n {
                let (r, g, b, a) = self.rgb_at(i);
                let base = i * dst_desc.bytes_per_pixel;
                out[base + dst_desc.r_offset.unwrap()] = r;
                out[base + dst_desc.g_offset.unwrap()] = g;
                out[base + dst_desc.b_offset.unwrap()] = b;
                if let Some(ao) = dst_desc.a_offset {
                    out[base + ao] = a;
                }
            }
            return Image::from_parts(self.width, self.height, target, out, None);
        }

        // Direct color -> indexed: quantize via octree.
        let n = self.width as usize * self.height as usize;
        let mut rgb = Vec::with_capacity(n * 3);
        for i in 0..n {
            let (r, g, b, _a) = self.rgb_at(i);
            rgb.push(r);
            rgb.push(g);
            rgb.push(b);
        }
        let mut tree = Octree::new();
        for chunk in rgb.chunks_exact(3) {
            tree.add_color(chunk[0], chunk[1], chunk[2]);
        }
        let (palette, indices) = tree.build_palette_and_indices(&rgb);
        Image::from_parts(self.width, self.height, target, indices, Some(palette))
    }
}
