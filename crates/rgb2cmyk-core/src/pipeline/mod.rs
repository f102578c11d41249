//! RGB JPEG → CMYK JPEG conversion.
//!
//! [`Converter`] drives one conversion: decode, pick a source profile,
//! transform to CMYK through the destination profile, then encode with
//! split CMY/K quantization tables and the destination profile embedded.
//!
//! ```no_run
//! # use rgb2cmyk_core::codec::ImageCodec;
//! # fn run<C: ImageCodec>(codec: C, jpeg: &[u8], cmyk_profile: Vec<u8>) -> Result<(), rgb2cmyk_core::ConvertError> {
//! use rgb2cmyk_core::{ConversionOptions, Converter, RenderIntent};
//!
//! let converter = Converter::with_moxcms(codec);
//! let options = ConversionOptions::new(cmyk_profile)
//!     .with_quality(90)
//!     .with_intent(RenderIntent::RelativeColorimetric);
//! let result = converter.convert(jpeg, &options)?;
//! println!("{}x{} -> {} bytes", result.source_width, result.source_height, result.encoded_bytes.len());
//! # Ok(())
//! # }
//! ```

mod resolve;

pub use resolve::{FallbackReason, SourceProfile, resolve_source_profile};

use std::fmt;

use tracing::{debug, warn};

use crate::codec::{CmykImage, ImageCodec, ImageInfo, RgbImage};
use crate::error::{ConvertError, Stage, StageExt};
use crate::icc::{self, IccError, IccHeader};
use crate::options::ConversionOptions;
use crate::quant;
use crate::transform::{self, ColorTransformEngine, MoxcmsEngine, RenderIntent, TransformHandle};

/// Output of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// The encoded CMYK JPEG, destination profile embedded
    pub encoded_bytes: Vec<u8>,
    pub source_width: u32,
    pub source_height: u32,
}

/// State of the profile embedded in an inspected JPEG
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Absent,
    Valid { len: usize, header: IccHeader },
    /// Present, but its header doesn't validate
    Invalid { len: usize, error: IccError },
}

/// Header-level report on a JPEG and its embedded profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub info: ImageInfo,
    pub file_size: usize,
    pub profile: ProfileStatus,
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimensions: {} x {}", self.info.width, self.info.height)?;
        writeln!(f, "Components: {}", self.info.num_components)?;
        writeln!(f, "Color space: {}", self.info.color_space.name())?;
        writeln!(
            f,
            "File size:  {} bytes ({:.1} MB)",
            self.file_size,
            self.file_size as f64 / (1024.0 * 1024.0)
        )?;
        match &self.profile {
            ProfileStatus::Absent => write!(f, "ICC profile: none"),
            ProfileStatus::Invalid { len, error } => {
                write!(f, "ICC profile: present ({len} bytes) but invalid: {error}")
            }
            ProfileStatus::Valid { len, header } => {
                writeln!(f, "ICC profile: {len} bytes")?;
                for line in header.summary().to_string().lines() {
                    writeln!(f, "  {line}")?;
                }
                Ok(())
            }
        }
    }
}

/// Runs conversions with an image codec and a color transform engine.
pub struct Converter<C, E> {
    codec: C,
    engine: E,
}

impl<C: ImageCodec> Converter<C, MoxcmsEngine> {
    /// Converter using the pure-Rust moxcms engine.
    pub fn with_moxcms(codec: C) -> Self {
        Self::new(codec, MoxcmsEngine::default())
    }
}

impl<C: ImageCodec, E: ColorTransformEngine> Converter<C, E> {
    pub fn new(codec: C, engine: E) -> Self {
        Self { codec, engine }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Convert an RGB JPEG to a CMYK JPEG.
    ///
    /// The transform handle is released before encoding starts, and on
    /// every failure path.
    pub fn convert(
        &self,
        jpeg: &[u8],
        options: &ConversionOptions,
    ) -> Result<PipelineResult, ConvertError> {
        let image = self.transform(jpeg, options)?;
        let (width, height) = (image.width(), image.height());

        let encoded_bytes = self.encode(
            &image,
            Some(&options.destination_profile),
            options.quality,
            options.cmy_quality_reduction,
        )?;

        debug!(
            width,
            height,
            output_len = encoded_bytes.len(),
            "conversion complete"
        );
        Ok(PipelineResult {
            encoded_bytes,
            source_width: width,
            source_height: height,
        })
    }

    /// Decode and color-separate without encoding.
    pub fn transform(
        &self,
        jpeg: &[u8],
        options: &ConversionOptions,
    ) -> Result<CmykImage, ConvertError> {
        self.separate(jpeg, options).inspect_err(log_failure)
    }

    fn separate(
        &self,
        jpeg: &[u8],
        options: &ConversionOptions,
    ) -> Result<CmykImage, ConvertError> {
        let destination = options.validate().at(Stage::ProfileResolution)?;
        if destination.data_color_space != icc::Signature::CMYK {
            debug!(
                color_space = %destination.data_color_space,
                "destination profile is not CMYK"
            );
        }

        let decoded = self.codec.decode(jpeg).at(Stage::Decode)?;
        let embedded = decoded.icc_profile;
        let rgb = RgbImage::new(decoded.width, decoded.height, decoded.pixels).at(Stage::Decode)?;
        debug!(
            width = rgb.width(),
            height = rgb.height(),
            embedded_icc = embedded.as_ref().map_or(0, Vec::len),
            "decoded source image"
        );

        let source = resolve_source_profile(
            options.source_profile_override.as_deref(),
            embedded.as_deref(),
        );

        self.apply_transform(
            &rgb,
            source.bytes(),
            &options.destination_profile,
            options.render_intent,
        )
    }

    fn apply_transform(
        &self,
        rgb: &RgbImage,
        source_profile: &[u8],
        destination_profile: &[u8],
        intent: RenderIntent,
    ) -> Result<CmykImage, ConvertError> {
        let guard = transform::acquire(&self.engine, source_profile, destination_profile, intent)
            .at(Stage::Transform)?;
        let cmyk = guard
            .apply(rgb.pixels(), rgb.width(), rgb.height())
            .at(Stage::Transform)?;
        CmykImage::new(rgb.width(), rgb.height(), cmyk).at(Stage::Transform)
    }

    /// Encode a CMYK raster with quantization tables derived from
    /// `quality` and `cmy_reduction`, embedding `destination_profile`.
    pub fn encode(
        &self,
        image: &CmykImage,
        destination_profile: Option<&[u8]>,
        quality: i32,
        cmy_reduction: i32,
    ) -> Result<Vec<u8>, ConvertError> {
        let tables = quant::generate(quality, cmy_reduction);
        self.codec
            .encode(image, &tables, destination_profile)
            .at(Stage::Encode)
            .inspect_err(log_failure)
    }

    /// Inspect a JPEG's header and embedded profile without decoding.
    pub fn identify(&self, jpeg: &[u8]) -> Result<Identification, ConvertError> {
        let info = self
            .codec
            .inspect(jpeg)
            .at(Stage::Decode)
            .inspect_err(log_failure)?;

        let profile = match info.icc_profile.as_deref() {
            None => ProfileStatus::Absent,
            Some(data) => match icc::validate(data) {
                Ok(header) => ProfileStatus::Valid {
                    len: data.len(),
                    header,
                },
                Err(error) => ProfileStatus::Invalid {
                    len: data.len(),
                    error,
                },
            },
        };

        Ok(Identification {
            info,
            file_size: jpeg.len(),
            profile,
        })
    }
}

fn log_failure(err: &ConvertError) {
    warn!(stage = %err.stage, error = %err.error, "conversion failed");
}
