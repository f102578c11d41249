//! ICC profile handling
//!
//! Everything here works on raw profile bytes; colorimetry is left to the
//! color transform engine.
//!
//! - [`header`]: parse and validate the 128-byte profile header
//! - [`markers`]: split a profile into APP2 marker payloads and put it back
//!   together
//! - [`srgb`]: the bundled fallback RGB profile
//!
//! # Example
//!
//! ```
//! use rgb2cmyk_core::icc;
//!
//! let profile = icc::default_rgb_profile();
//! let header = icc::validate(profile)?;
//! assert_eq!(header.color_space_name(), "RGB");
//!
//! let markers = icc::chunk(profile)?;
//! assert_eq!(icc::reassemble(&markers)?.as_deref(), Some(profile));
//! # Ok::<(), rgb2cmyk_core::Error>(())
//! ```

pub mod header;
pub mod markers;
pub mod srgb;

mod error;

pub use error::{IccError, MarkerError};
pub use header::{
    IccHeader, ProfileSummary, ProfileVersion, Signature, color_space_name, device_class_name,
    validate,
};
pub use markers::{ICC_IDENTIFIER, MAX_CHUNK_DATA, MAX_CHUNKS, MarkerChunk, chunk, reassemble};
pub use srgb::default_rgb_profile;
