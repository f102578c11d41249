//! Image codec contract and raster types.
//!
//! JPEG entropy decoding and encoding are supplied by the host through
//! [`ImageCodec`]; this crate never touches compressed scan data itself.

use crate::error::{BoxError, Error, Result};
use crate::quant::QuantTables;

/// Validate dimensions and return the expected buffer length.
fn expected_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(Error::InvalidDimensions { width, height })
}

/// Interleaved 8-bit RGB raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbImage {
    pub const CHANNELS: usize = 3;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height, Self::CHANNELS)?;
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels viewed as `[R, G, B]` triples.
    pub fn as_rgb(&self) -> &[[u8; 3]] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Interleaved 8-bit CMYK raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmykImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CmykImage {
    pub const CHANNELS: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height, Self::CHANNELS)?;
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels viewed as `[C, M, Y, K]` quads.
    pub fn as_cmyk(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Result of decoding a source JPEG.
///
/// Grayscale sources are expected to arrive already expanded to RGB.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved RGB8, `width * height * 3` bytes
    pub pixels: Vec<u8>,
    /// Reassembled embedded ICC profile, if any
    pub icc_profile: Option<Vec<u8>>,
}

/// Container-level color space of a JPEG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    Unknown,
    Grayscale,
    Rgb,
    YCbCr,
    Cmyk,
    Ycck,
}

impl JpegColorSpace {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Grayscale => "Grayscale",
            Self::Rgb => "RGB",
            Self::YCbCr => "YCbCr",
            Self::Cmyk => "CMYK",
            Self::Ycck => "YCCK",
        }
    }
}

/// Header-level metadata of a JPEG, obtained without decoding pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub num_components: u8,
    pub color_space: JpegColorSpace,
    pub icc_profile: Option<Vec<u8>>,
}

/// External JPEG codec.
///
/// Implementations own entropy coding; this crate supplies the quantization
/// tables and the ICC profile to embed. Profiles passed to [`encode`] should
/// be written with [`crate::icc::chunk`] (or
/// [`crate::jpeg::write_icc_segments`]).
///
/// [`encode`]: ImageCodec::encode
pub trait ImageCodec {
    /// Decode to RGB8, expanding grayscale and YCbCr as needed.
    fn decode(&self, data: &[u8]) -> std::result::Result<DecodedImage, BoxError>;

    /// Encode a CMYK raster with the given tables, components 0..3 using
    /// `tables.cmy` and component 3 using `tables.k`, no chroma subsampling.
    fn encode(
        &self,
        image: &CmykImage,
        tables: &QuantTables,
        icc_profile: Option<&[u8]>,
    ) -> std::result::Result<Vec<u8>, BoxError>;

    /// Read header metadata and the embedded profile.
    fn inspect(&self, data: &[u8]) -> std::result::Result<ImageInfo, BoxError>;
}
