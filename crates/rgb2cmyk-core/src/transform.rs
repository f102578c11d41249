//! Color transform engine contract.
//!
//! A transform handle owns native state (profiles, LUTs) that must be freed
//! deterministically. [`acquire`] wraps the handle in a [`TransformGuard`]
//! that releases it on every exit path, including early returns from later
//! pipeline stages.

use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, Error};

/// Rendering intent for color transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum RenderIntent {
    /// Perceptual rendering intent - best for photographic images
    #[default]
    #[serde(rename = "perceptual")]
    Perceptual,
    /// Relative colorimetric - preserves in-gamut colors, clips out-of-gamut
    #[serde(rename = "relative")]
    RelativeColorimetric,
    /// Saturation - maintains saturation, may shift hue
    #[serde(rename = "saturation")]
    Saturation,
    /// Absolute colorimetric - preserves white point
    #[serde(rename = "absolute")]
    AbsoluteColorimetric,
}

impl RenderIntent {
    /// ICC intent code (0..=3)
    pub fn code(&self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Perceptual => "perceptual",
            Self::RelativeColorimetric => "relative",
            Self::Saturation => "saturation",
            Self::AbsoluteColorimetric => "absolute",
        }
    }
}

impl FromStr for RenderIntent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perceptual" => Ok(Self::Perceptual),
            "relative" => Ok(Self::RelativeColorimetric),
            "saturation" => Ok(Self::Saturation),
            "absolute" => Ok(Self::AbsoluteColorimetric),
            _ => Err(Error::InvalidIntent(s.to_string())),
        }
    }
}

impl From<RenderIntent> for moxcms::RenderingIntent {
    fn from(intent: RenderIntent) -> Self {
        match intent {
            RenderIntent::Perceptual => moxcms::RenderingIntent::Perceptual,
            RenderIntent::RelativeColorimetric => moxcms::RenderingIntent::RelativeColorimetric,
            RenderIntent::Saturation => moxcms::RenderingIntent::Saturation,
            RenderIntent::AbsoluteColorimetric => moxcms::RenderingIntent::AbsoluteColorimetric,
        }
    }
}

/// A live RGB8 → CMYK8 transform.
pub trait TransformHandle {
    /// Transform `width * height` interleaved RGB pixels into interleaved
    /// CMYK pixels of the same dimensions.
    fn apply(&self, rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BoxError>;

    /// Free native resources. Must be idempotent and safe after a failed
    /// `apply`.
    fn release(&mut self);
}

/// Factory for transform handles.
pub trait ColorTransformEngine {
    type Handle: TransformHandle;

    /// Build a transform from a source RGB profile to a destination CMYK
    /// profile. Fails if either profile is unusable.
    fn create(
        &self,
        source_profile: &[u8],
        destination_profile: &[u8],
        intent: RenderIntent,
    ) -> Result<Self::Handle, BoxError>;
}

/// Scoped ownership of a transform handle; releases it when dropped.
pub struct TransformGuard<H: TransformHandle> {
    handle: H,
}

impl<H: TransformHandle> TransformGuard<H> {
    pub fn new(handle: H) -> Self {
        Self { handle }
    }
}

impl<H: TransformHandle> Deref for TransformGuard<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: TransformHandle> DerefMut for TransformGuard<H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: TransformHandle> Drop for TransformGuard<H> {
    fn drop(&mut self) {
        self.handle.release();
    }
}

/// Create a transform and put it under a guard.
pub fn acquire<E: ColorTransformEngine + ?Sized>(
    engine: &E,
    source_profile: &[u8],
    destination_profile: &[u8],
    intent: RenderIntent,
) -> Result<TransformGuard<E::Handle>, BoxError> {
    let handle = engine.create(source_profile, destination_profile, intent)?;
    Ok(TransformGuard::new(handle))
}

fn check_rgb_len(rgb: &[u8], width: u32, height: u32) -> Result<usize, BoxError> {
    let pixels = width as usize * height as usize;
    if rgb.len() != pixels * 3 {
        return Err(Box::new(Error::BufferSize {
            expected: pixels * 3,
            actual: rgb.len(),
        }));
    }
    Ok(pixels)
}

/// Pure-Rust engine backed by moxcms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoxcmsEngine {
    /// Prefer fixed-point math for performance
    pub prefer_fixed_point: bool,
}

/// Transform handle produced by [`MoxcmsEngine`]
pub struct MoxcmsHandle {
    executor: Option<Box<moxcms::Transform8BitExecutor>>,
}

impl ColorTransformEngine for MoxcmsEngine {
    type Handle = MoxcmsHandle;

    fn create(
        &self,
        source_profile: &[u8],
        destination_profile: &[u8],
        intent: RenderIntent,
    ) -> Result<MoxcmsHandle, BoxError> {
        let src = moxcms::ColorProfile::new_from_slice(source_profile)
            .map_err(|e| format!("moxcms: failed to open source profile: {e:?}"))?;
        let dst = moxcms::ColorProfile::new_from_slice(destination_profile)
            .map_err(|e| format!("moxcms: failed to open destination profile: {e:?}"))?;

        let options = moxcms::TransformOptions {
            rendering_intent: intent.into(),
            prefer_fixed_point: self.prefer_fixed_point,
            ..Default::default()
        };

        // moxcms carries four-ink data in the Rgba layout
        let executor = src
            .create_transform_8bit(moxcms::Layout::Rgb, &dst, moxcms::Layout::Rgba, options)
            .map_err(|e| format!("moxcms: failed to create transform: {e:?}"))?;

        debug!(intent = intent.name(), "created moxcms RGB -> CMYK transform");
        Ok(MoxcmsHandle {
            executor: Some(executor),
        })
    }
}

impl TransformHandle for MoxcmsHandle {
    fn apply(&self, rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BoxError> {
        let executor = self
            .executor
            .as_ref()
            .ok_or("moxcms: transform already released")?;
        let pixels = check_rgb_len(rgb, width, height)?;

        let mut cmyk = vec![0u8; pixels * 4];
        executor
            .transform(rgb, &mut cmyk)
            .map_err(|e| format!("moxcms: transform failed: {e:?}"))?;
        Ok(cmyk)
    }

    fn release(&mut self) {
        self.executor = None;
    }
}

#[cfg(feature = "lcms2")]
pub use self::lcms::{Lcms2Engine, Lcms2Handle};

#[cfg(feature = "lcms2")]
mod lcms {
    use lcms2::{Intent, PixelFormat, Profile, Transform};
    use tracing::debug;

    use super::{ColorTransformEngine, RenderIntent, TransformHandle, check_rgb_len};
    use crate::error::BoxError;

    impl From<RenderIntent> for Intent {
        fn from(intent: RenderIntent) -> Self {
            match intent {
                RenderIntent::Perceptual => Intent::Perceptual,
                RenderIntent::RelativeColorimetric => Intent::RelativeColorimetric,
                RenderIntent::Saturation => Intent::Saturation,
                RenderIntent::AbsoluteColorimetric => Intent::AbsoluteColorimetric,
            }
        }
    }

    /// Engine backed by Little CMS 2
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Lcms2Engine;

    /// Transform handle produced by [`Lcms2Engine`]
    pub struct Lcms2Handle {
        transform: Option<Transform<[u8; 3], [u8; 4]>>,
    }

    impl ColorTransformEngine for Lcms2Engine {
        type Handle = Lcms2Handle;

        fn create(
            &self,
            source_profile: &[u8],
            destination_profile: &[u8],
            intent: RenderIntent,
        ) -> Result<Lcms2Handle, BoxError> {
            let src = Profile::new_icc(source_profile)
                .map_err(|e| format!("lcms2: failed to open source profile: {e}"))?;
            let dst = Profile::new_icc(destination_profile)
                .map_err(|e| format!("lcms2: failed to open destination profile: {e}"))?;

            let transform = Transform::new(
                &src,
                PixelFormat::RGB_8,
                &dst,
                PixelFormat::CMYK_8,
                intent.into(),
            )
            .map_err(|e| format!("lcms2: failed to create transform: {e}"))?;

            debug!(intent = intent.name(), "created lcms2 RGB -> CMYK transform");
            Ok(Lcms2Handle {
                transform: Some(transform),
            })
        }
    }

    impl TransformHandle for Lcms2Handle {
        fn apply(&self, rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BoxError> {
            let transform = self
                .transform
                .as_ref()
                .ok_or("lcms2: transform already released")?;
            let pixels = check_rgb_len(rgb, width, height)?;

            let src: &[[u8; 3]] = bytemuck::cast_slice(rgb);
            let mut dst = vec![[0u8; 4]; pixels];
            let row = width as usize;
            for (src_row, dst_row) in src.chunks(row).zip(dst.chunks_mut(row)) {
                transform.transform_pixels(src_row, dst_row);
            }
            Ok(dst.into_iter().flatten().collect())
        }

        fn release(&mut self) {
            self.transform = None;
        }
    }
}
