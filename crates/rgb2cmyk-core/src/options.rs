//! Conversion settings.

use serde::{Deserialize, Serialize};

use crate::icc::{self, IccError, IccHeader};
use crate::quant::{DEFAULT_CMY_REDUCTION, DEFAULT_QUALITY};
use crate::transform::RenderIntent;

/// Settings for one RGB → CMYK conversion.
///
/// Deserializes from any serde format; missing fields take the defaults
/// (quality 85, CMY reduction 15, perceptual intent). The destination
/// profile has no sensible default and must be provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Source RGB profile that overrides anything embedded in the input
    pub source_profile_override: Option<Vec<u8>>,
    /// Destination CMYK profile; also embedded in the output
    pub destination_profile: Vec<u8>,
    /// Encoder quality, 1-100
    pub quality: i32,
    /// How much lower the CMY table's quality is than K's
    pub cmy_quality_reduction: i32,
    pub render_intent: RenderIntent,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            source_profile_override: None,
            destination_profile: Vec::new(),
            quality: DEFAULT_QUALITY,
            cmy_quality_reduction: DEFAULT_CMY_REDUCTION,
            render_intent: RenderIntent::default(),
        }
    }
}

impl ConversionOptions {
    pub fn new(destination_profile: impl Into<Vec<u8>>) -> Self {
        Self {
            destination_profile: destination_profile.into(),
            ..Self::default()
        }
    }

    pub fn with_source_profile(mut self, profile: impl Into<Vec<u8>>) -> Self {
        self.source_profile_override = Some(profile.into());
        self
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_cmy_reduction(mut self, reduction: i32) -> Self {
        self.cmy_quality_reduction = reduction;
        self
    }

    pub fn with_intent(mut self, intent: RenderIntent) -> Self {
        self.render_intent = intent;
        self
    }

    /// Check that the destination profile has a valid ICC header.
    pub fn validate(&self) -> Result<IccHeader, IccError> {
        icc::validate(&self.destination_profile)
    }
}
