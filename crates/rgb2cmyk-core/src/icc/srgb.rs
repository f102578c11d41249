//! Bundled default RGB profile.
//!
//! Used only when a conversion has no usable source profile. moxcms's
//! built-in sRGB is serialized to ICC v4 once on first use and shared for
//! the life of the process.

use std::sync::LazyLock;

use tracing::warn;

static DEFAULT_RGB_PROFILE: LazyLock<Vec<u8>> = LazyLock::new(|| {
    moxcms::ColorProfile::new_srgb()
        .encode()
        .unwrap_or_else(|e| {
            // An empty profile is rejected by every engine, so the failure
            // surfaces at the transform stage.
            warn!(error = ?e, "failed to serialize built-in sRGB profile");
            Vec::new()
        })
});

/// The bundled sRGB profile bytes.
pub fn default_rgb_profile() -> &'static [u8] {
    &DEFAULT_RGB_PROFILE
}
