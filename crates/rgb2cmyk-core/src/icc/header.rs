//! ICC Profile Header
//!
//! Only the fixed 128-byte header is consumed; tag tables are left to the
//! color transform engine. See ICC.1:2022 Section 7.2.
//!
//! | offset | field                     |
//! |--------|---------------------------|
//! | 0..4   | declared profile size     |
//! | 8..10  | version (major, minor.bugfix nibbles) |
//! | 12..16 | device class              |
//! | 16..20 | data color space          |
//! | 20..24 | profile connection space  |
//! | 36..40 | file signature `acsp`     |

use std::fmt;

use super::error::IccError;

/// Profile file signature - must be 'acsp' (0x61637370)
pub const PROFILE_SIGNATURE: u32 = 0x61637370;

/// Size of the fixed ICC header
pub const HEADER_SIZE: usize = 128;

/// Largest profile accepted by [`validate`] (4 MiB).
///
/// Not a format limit; it bounds what a hostile file can make us hold.
pub const MAX_PROFILE_SIZE: usize = 4 * 1024 * 1024;

/// A four-byte ICC signature such as `RGB ` or `prtr`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 4]);

impl Signature {
    pub const RGB: Self = Self(*b"RGB ");
    pub const CMYK: Self = Self(*b"CMYK");
    pub const GRAY: Self = Self(*b"GRAY");
    pub const LAB: Self = Self(*b"Lab ");
    pub const XYZ: Self = Self(*b"XYZ ");

    fn read(data: &[u8], offset: usize) -> Self {
        Self([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    }

    /// Raw signature text, padding included. Non-ASCII bytes become `?`.
    pub fn as_str(&self) -> String {
        self.0
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect()
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:?})", self.as_str())
    }
}

impl PartialEq<&str> for Signature {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

/// Profile version as stored at offsets 8..10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub bugfix: u8,
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.bugfix)
    }
}

/// The header fields this crate cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IccHeader {
    /// Profile size as declared at offset 0. Never checked against the data.
    pub declared_size: u32,
    pub version: ProfileVersion,
    pub device_class: Signature,
    pub data_color_space: Signature,
    pub connection_space: Signature,
}

/// Parse and validate the ICC header at the start of `data`.
pub fn validate(data: &[u8]) -> Result<IccHeader, IccError> {
    if data.len() < HEADER_SIZE {
        return Err(IccError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if data.len() > MAX_PROFILE_SIZE {
        return Err(IccError::TooLarge {
            max: MAX_PROFILE_SIZE,
            actual: data.len(),
        });
    }

    let signature = u32::from_be_bytes([data[36], data[37], data[38], data[39]]);
    if signature != PROFILE_SIGNATURE {
        return Err(IccError::InvalidSignature(signature));
    }

    Ok(IccHeader {
        declared_size: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
        version: ProfileVersion {
            major: data[8],
            minor: data[9] >> 4,
            bugfix: data[9] & 0x0F,
        },
        device_class: Signature::read(data, 12),
        data_color_space: Signature::read(data, 16),
        connection_space: Signature::read(data, 20),
    })
}

impl IccHeader {
    /// Parse header from bytes
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        validate(data)
    }

    /// Get the version as a tuple (major, minor, bugfix)
    pub fn version_tuple(&self) -> (u8, u8, u8) {
        (self.version.major, self.version.minor, self.version.bugfix)
    }

    /// Whether the declared size agrees with the actual buffer length.
    ///
    /// [`validate`] does not enforce this.
    pub fn declared_size_matches(&self, len: usize) -> bool {
        self.declared_size as usize == len
    }

    pub fn is_grayscale(&self) -> bool {
        self.data_color_space == Signature::GRAY
    }

    pub fn color_space_name(&self) -> String {
        color_space_name(self.data_color_space)
    }

    pub fn connection_space_name(&self) -> String {
        color_space_name(self.connection_space)
    }

    pub fn device_class_name(&self) -> String {
        device_class_name(self.device_class)
    }

    pub fn summary(&self) -> ProfileSummary<'_> {
        ProfileSummary(self)
    }
}

/// Human-readable name for a color space signature
pub fn color_space_name(sig: Signature) -> String {
    match &sig.0 {
        b"RGB " => "RGB".into(),
        b"CMYK" => "CMYK".into(),
        b"GRAY" => "Grayscale".into(),
        b"Lab " => "CIELAB".into(),
        b"XYZ " => "CIEXYZ".into(),
        _ => sig.as_str(),
    }
}

/// Human-readable name for a device class signature
pub fn device_class_name(sig: Signature) -> String {
    match &sig.0 {
        b"mntr" => "Display".into(),
        b"prtr" => "Output".into(),
        b"scnr" => "Input".into(),
        b"link" => "DeviceLink".into(),
        b"spac" => "ColorSpace".into(),
        b"abst" => "Abstract".into(),
        b"nmcl" => "NamedColor".into(),
        _ => sig.as_str(),
    }
}

/// Multi-line diagnostic rendering of a header
pub struct ProfileSummary<'a>(&'a IccHeader);

impl fmt::Display for ProfileSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        writeln!(f, "Version:     {}", h.version)?;
        writeln!(f, "Color space: {}", h.color_space_name())?;
        writeln!(f, "PCS:         {}", h.connection_space_name())?;
        write!(f, "Class:       {}", h.device_class_name())
    }
}
