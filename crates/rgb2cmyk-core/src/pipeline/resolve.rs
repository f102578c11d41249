//! Source profile selection.

use tracing::{debug, info};

use crate::icc::{self, Signature, default_rgb_profile};

/// Why the bundled RGB profile was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Neither an override nor an embedded profile was available
    NoProfile,
    /// The embedded profile describes grayscale data, which can't describe
    /// the RGB raster the decoder produced
    GrayscaleDiscarded,
}

/// The source profile chosen for a conversion, tagged with the rule that
/// selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceProfile<'a> {
    Override(&'a [u8]),
    Embedded(&'a [u8]),
    Default { reason: FallbackReason },
}

impl<'a> SourceProfile<'a> {
    /// Profile bytes to hand to the transform engine.
    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            Self::Override(p) | Self::Embedded(p) => p,
            Self::Default { .. } => default_rgb_profile(),
        }
    }

    pub fn rule(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Embedded(_) => "embedded",
            Self::Default {
                reason: FallbackReason::NoProfile,
            } => "default (no profile)",
            Self::Default {
                reason: FallbackReason::GrayscaleDiscarded,
            } => "default (grayscale discarded)",
        }
    }

    /// Apply the selection rules in order, stopping at the first that
    /// fires. `embedded_space` is the data color space of `embedded` when
    /// its header parsed.
    pub fn select(
        override_profile: Option<&'a [u8]>,
        embedded: Option<&'a [u8]>,
        embedded_space: Option<Signature>,
    ) -> Self {
        if let Some(profile) = override_profile {
            return Self::Override(profile);
        }
        let Some(profile) = embedded.filter(|p| !p.is_empty()) else {
            return Self::Default {
                reason: FallbackReason::NoProfile,
            };
        };
        if embedded_space == Some(Signature::GRAY) {
            return Self::Default {
                reason: FallbackReason::GrayscaleDiscarded,
            };
        }
        Self::Embedded(profile)
    }
}

/// Pick the source RGB profile for a conversion.
///
/// An override always wins and is used without inspection. Otherwise the
/// embedded profile is used unless its header declares grayscale data;
/// with nothing usable left, the bundled sRGB profile is returned. An
/// embedded profile whose header doesn't parse is passed through as-is.
pub fn resolve_source_profile<'a>(
    override_profile: Option<&'a [u8]>,
    embedded: Option<&'a [u8]>,
) -> SourceProfile<'a> {
    let embedded_space = match (override_profile, embedded) {
        (None, Some(profile)) => icc::validate(profile).ok().map(|h| h.data_color_space),
        _ => None,
    };

    let source = SourceProfile::select(override_profile, embedded, embedded_space);
    match source {
        SourceProfile::Default {
            reason: FallbackReason::GrayscaleDiscarded,
        } => info!("discarding grayscale embedded profile, using bundled sRGB"),
        _ => debug!(rule = source.rule(), "resolved source profile"),
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(space: &[u8; 4]) -> Vec<u8> {
        let mut data = vec![0u8; 128];
        data[0..4].copy_from_slice(&128u32.to_be_bytes());
        data[8] = 4;
        data[12..16].copy_from_slice(b"mntr");
        data[16..20].copy_from_slice(space);
        data[20..24].copy_from_slice(b"XYZ ");
        data[36..40].copy_from_slice(b"acsp");
        data
    }

    #[test]
    fn test_override_wins_over_anything() {
        let gray = header(b"GRAY");
        let ovr = [1u8, 2, 3];
        let source = resolve_source_profile(Some(&ovr), Some(&gray));
        assert_eq!(source, SourceProfile::Override(&ovr));
        assert_eq!(source.bytes(), &ovr);

        let source = resolve_source_profile(Some(&ovr), Some(b"garbage"));
        assert_eq!(source, SourceProfile::Override(&ovr));
    }

    #[test]
    fn test_override_is_not_grayscale_checked() {
        let gray = header(b"GRAY");
        assert_eq!(
            resolve_source_profile(Some(&gray), None),
            SourceProfile::Override(&gray)
        );
    }

    #[test]
    fn test_embedded_rgb_is_used() {
        let rgb = header(b"RGB ");
        assert_eq!(
            resolve_source_profile(None, Some(&rgb)),
            SourceProfile::Embedded(&rgb)
        );
    }

    #[test]
    fn test_grayscale_embedded_is_discarded() {
        let gray = header(b"GRAY");
        let source = resolve_source_profile(None, Some(&gray));
        assert_eq!(
            source,
            SourceProfile::Default {
                reason: FallbackReason::GrayscaleDiscarded
            }
        );
        assert_eq!(source.bytes(), default_rgb_profile());
    }

    #[test]
    fn test_invalid_embedded_is_kept() {
        let junk = b"definitely not an ICC profile".as_slice();
        assert_eq!(
            resolve_source_profile(None, Some(junk)),
            SourceProfile::Embedded(junk)
        );
    }

    #[test]
    fn test_no_profile_falls_back() {
        let source = resolve_source_profile(None, None);
        assert_eq!(
            source,
            SourceProfile::Default {
                reason: FallbackReason::NoProfile
            }
        );
        assert_eq!(source.bytes(), default_rgb_profile());

        assert_eq!(
            resolve_source_profile(None, Some(&[])),
            SourceProfile::Default {
                reason: FallbackReason::NoProfile
            }
        );
    }

    #[test]
    fn test_select_rule_order() {
        let p = [0u8; 4];
        assert_eq!(
            SourceProfile::select(Some(&p), Some(&p), Some(Signature::GRAY)),
            SourceProfile::Override(&p)
        );
        assert_eq!(
            SourceProfile::select(None, Some(&p), Some(Signature::CMYK)),
            SourceProfile::Embedded(&p)
        );
        assert_eq!(
            SourceProfile::select(None, None, Some(Signature::GRAY)).rule(),
            "default (no profile)"
        );
    }
}
