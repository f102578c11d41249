//! Channel-differentiated quantization tables.
//!
//! CMYK output uses two tables: one shared by the cyan, magenta and yellow
//! components and one for black. Chroma-bearing inks tolerate coarser
//! quantization than K, which carries most edge and text detail, so the CMY
//! table is scaled at a lower quality.
//!
//! Scaling follows the IJG `jpeg_quality_scaling` formula bit-exactly:
//! - Quality 50 → scale factor 100 (use table as-is)
//! - Quality 100 → scale factor 0 (all values become 1)
//! - Quality < 50 → scale = 5000 / quality
//! - Quality ≥ 50 → scale = 200 - 2 * quality

/// Number of coefficients in an 8x8 block
pub const DCTSIZE2: usize = 64;

/// Standard luminance quantization table (ITU-T T.81, Annex K, Table K.1), in
/// natural (row-major) order.
pub const STD_LUMINANCE_QUANT_TBL: [u16; DCTSIZE2] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Default encoder quality
pub const DEFAULT_QUALITY: i32 = 85;

/// Default quality reduction applied to the CMY table
pub const DEFAULT_CMY_REDUCTION: i32 = 15;

/// A 64-entry quantization table with every value in `1..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    pub values: [u16; DCTSIZE2],
}

impl QuantTable {
    /// Scale a base table by a percentage, rounding half up and clamping to
    /// the baseline range.
    pub fn scaled(base: &[u16; DCTSIZE2], scale_factor: u32) -> Self {
        let mut values = [0u16; DCTSIZE2];
        for (out, &b) in values.iter_mut().zip(base.iter()) {
            let v = (b as u32 * scale_factor + 50) / 100;
            *out = v.clamp(1, 255) as u16;
        }
        Self { values }
    }
}

/// The pair of tables handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTables {
    /// Shared by the C, M and Y components
    pub cmy: QuantTable,
    /// Used by the K component
    pub k: QuantTable,
}

/// Convert a quality value to a scaling factor.
///
/// Quality is clamped to `1..=100` first.
pub fn quality_to_scale_factor(quality: i32) -> u32 {
    let q = quality.clamp(1, 100);
    if q < 50 {
        (5000 / q) as u32
    } else {
        (200 - q * 2) as u32
    }
}

/// Scale `base` to the given quality.
///
/// # Arguments
/// * `base` - Base quantization table
/// * `quality` - Quality value; clamped to 1-100
///
/// # Returns
/// Scaled quantization table
pub fn scale(base: &[u16; DCTSIZE2], quality: i32) -> QuantTable {
    QuantTable::scaled(base, quality_to_scale_factor(quality))
}

/// Derive the CMY and K tables for a quality / CMY-reduction pair.
///
/// The CMY quality is `quality - cmy_reduction`, never below 1. Both tables
/// are scaled from [`STD_LUMINANCE_QUANT_TBL`].
pub fn generate(quality: i32, cmy_reduction: i32) -> QuantTables {
    let cmy_quality = quality.saturating_sub(cmy_reduction).max(1);
    QuantTables {
        cmy: scale(&STD_LUMINANCE_QUANT_TBL, cmy_quality),
        k: scale(&STD_LUMINANCE_QUANT_TBL, quality),
    }
}
