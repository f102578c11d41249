//! # rgb2cmyk - ICC-managed RGB to CMYK JPEG conversion
//!
//! Converts RGB JPEGs into print-ready CMYK JPEGs through a destination
//! CMYK ICC profile, embedding that profile in the output.
//!
//! ## Pieces
//!
//! - [`icc`]: ICC header validation and APP2 marker chunking/reassembly
//! - [`quant`]: split CMY/K quantization tables from a quality setting
//! - [`pipeline`]: the [`Converter`] that ties decode, profile resolution,
//!   color transform and encode together
//! - [`codec`] and [`transform`]: the collaborator contracts for JPEG
//!   entropy coding and color transforms, with a moxcms engine (and an
//!   lcms2 one behind the `lcms2` feature)
//! - [`jpeg`]: header-only JPEG marker helpers
//!
//! ## Quick Start
//!
//! ```
//! use rgb2cmyk_core::{icc, quant};
//!
//! // Split a profile into APP2 payloads and put it back together
//! let profile = icc::default_rgb_profile();
//! let markers = icc::chunk(profile)?;
//! assert_eq!(icc::reassemble(&markers)?.as_deref(), Some(profile));
//!
//! // Tables for quality 85: K at 85, CMY at 70
//! let tables = quant::generate(85, 15);
//! assert!(tables.cmy.values[0] > tables.k.values[0]);
//! # Ok::<(), rgb2cmyk_core::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod icc;
pub mod jpeg;
pub mod options;
pub mod pipeline;
pub mod quant;
pub mod transform;

pub use codec::{CmykImage, DecodedImage, ImageCodec, ImageInfo, JpegColorSpace, RgbImage};
pub use error::{BoxError, ConvertError, Error, ErrorKind, Result, Stage};
pub use icc::{IccError, IccHeader, MarkerError};
pub use options::ConversionOptions;
pub use pipeline::{
    Converter, FallbackReason, Identification, PipelineResult, ProfileStatus, SourceProfile,
    resolve_source_profile,
};
pub use quant::{QuantTable, QuantTables};
pub use transform::{
    ColorTransformEngine, MoxcmsEngine, RenderIntent, TransformGuard, TransformHandle,
};

#[cfg(feature = "lcms2")]
pub use transform::Lcms2Engine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
