//! Pixel format enumeration and the descriptor table that drives conversion.

/// Pixel format of an [`crate::Image`].
///
/// A closed set, matching the five formats the codecs in this crate can
/// produce or consume. `Unknown` and `DontCare` are caller-facing sentinels
/// used only at the [`crate::facade`] boundary, never stored on an `Image`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit indexed color with a 256-entry RGB palette.
    RgbP8,
    /// 24-bit direct color, red first.
    Rgb,
    /// 24-bit direct color, blue first.
    Bgr,
    /// 32-bit direct color with alpha, red first.
    Rgba,
    /// 32-bit direct color with alpha, blue first.
    Bgra,
}

/// Sentinel wrapper around [`PixelFormat`] for caller-facing entry points
/// that additionally need "unspecified" and "whatever the codec produces".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestedFormat {
    Unknown,
    DontCare,
    Format(PixelFormat),
}

/// Read-only description of a [`PixelFormat`]'s byte layout.
#[derive(Clone, Copy, Debug)]
pub struct PixelFormatDescriptor {
    pub is_direct_color: bool,
    pub has_alpha: bool,
    pub bytes_per_pixel: usize,
    /// Byte offset of each channel within one pixel. `None` for indexed
    /// formats and for the alpha channel on formats without alpha.
    pub r_offset: Option<usize>,
    pub g_offset: Option<usize>,
    pub b_offset: Option<usize>,
    pub a_offset: Option<usize>,
}

impl PixelFormat {
    /// Look up this format's descriptor.
    pub const fn descriptor(self) -> PixelFormatDescriptor {
        match self {
            PixelFormat::RgbP8 => PixelFormatDescriptor {
                is_direct_color: false,
                has_alpha: false,
                bytes_per_pixel: 1,
                r_offset: None,
                g_offset: None,
                b_offset: None,
                a_offset: None,
            },
            PixelFormat::Rgb => PixelFormatDescriptor {
                is_direct_color: true,
                has_alpha: false,
                bytes_per_pixel: 3,
                r_offset: Some(0),
                g_offset: Some(1),
                b_offset: Some(2),
                a_offset: None,
            },
            PixelFormat::Bgr => PixelFormatDescriptor {
                is_direct_color: true,
                has_alpha: false,
                bytes_per_pixel: 3,
                r_offset: Some(2),
                g_offset: Some(1),
                b_offset: Some(0),
                a_offset: None,
            },
            PixelFormat::Rgba => PixelFormatDescriptor {
                is_direct_color: true,
                has_alpha: true,
                bytes_per_pixel: 4,
                r_offset: Some(0),
                g_offset: Some(1),
                b_offset: Some(2),
                a_offset: Some(3),
            },
            PixelFormat::Bgra => PixelFormatDescriptor {
                is_direct_color: true,
                has_alpha: true,
                bytes_per_pixel: 4,
                r_offset: Some(2),
                g_offset: Some(1),
                b_offset: Some(0),
                a_offset: Some(3),
            },
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.descriptor().bytes_per_pixel
    }

    pub const fn is_direct_color(self) -> bool {
        self.descriptor().is_direct_color
    }

    pub const fn has_alpha(self) -> bool {
        self.descriptor().has_alpha
    }
}

/// A 256-entry RGB palette, 3 bytes per entry, tightly packed (768 bytes).
#[derive(Clone, Debug)]
pub struct Palette(pub [[u8; 3]; 256]);

impl Default for Palette {
    fn default() -> Self {
        Palette([[0u8; 3]; 256])
    }
}

impl Palette {
    pub fn from_bytes(bytes: &[u8; 768]) -> Self {
        let mut entries = [[0u8; 3]; 256];
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.copy_from_slice(&bytes[i * 3..i * 3 + 3]);
        }
        Palette(entries)
    }

    pub fn get(&self, index: u8) -> [u8; 3] {
        self.0[index as usize]
    }
}
