//! JPEG marker-level helpers.
//!
//! Only the segment structure before the first scan is read; compressed
//! data is never touched.

use tracing::debug;

use crate::codec::{ImageInfo, JpegColorSpace};
use crate::error::{Error, Result};
use crate::icc::{self, MarkerError};

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP2: u8 = 0xE2;
const APP14: u8 = 0xEE;

/// A marker segment preceding the first scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub marker: u8,
    /// Segment data (excluding marker and length bytes)
    pub data: &'a [u8],
    /// Offset of the `FF` byte in the file
    pub offset: usize,
}

fn is_sof(marker: u8) -> bool {
    // SOF0..SOF15 minus DHT (C4), JPG (C8) and DAC (CC)
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Walk the header segments of a JPEG, stopping at SOS or EOI.
pub fn header_segments(data: &[u8]) -> Result<Vec<Segment<'_>>> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(Error::Jpeg("Not a valid JPEG (missing SOI)".into()));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        // Skip fill bytes
        while pos < data.len() && data[pos] != 0xFF {
            pos += 1;
        }
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        if pos + 1 >= data.len() {
            return Err(Error::Jpeg("Unexpected end of data before scan".into()));
        }

        let offset = pos;
        let marker = data[pos + 1];
        pos += 2;

        if marker == EOI {
            break;
        }
        if marker == SOI || (0xD0..=0xD7).contains(&marker) || marker == 0x01 {
            continue;
        }

        if pos + 2 > data.len() {
            return Err(Error::Jpeg(format!(
                "Truncated segment length at offset {offset}"
            )));
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 || pos + length > data.len() {
            return Err(Error::Jpeg(format!(
                "Invalid segment length {length} at offset {offset}"
            )));
        }

        segments.push(Segment {
            marker,
            data: &data[pos + 2..pos + length],
            offset,
        });
        pos += length;

        if marker == SOS {
            break;
        }
    }

    Ok(segments)
}

/// Every APP2 payload in file order.
pub fn app2_payloads(data: &[u8]) -> Result<Vec<&[u8]>> {
    Ok(header_segments(data)?
        .into_iter()
        .filter(|s| s.marker == APP2)
        .map(|s| s.data)
        .collect())
}

/// Reassemble the embedded ICC profile of a JPEG, if any.
pub fn extract_icc_profile(data: &[u8]) -> Result<Option<Vec<u8>>> {
    Ok(icc::reassemble(app2_payloads(data)?)?)
}

/// Complete APP2 segments (`FF E2`, length, payload) carrying `profile`.
pub fn write_icc_segments(profile: &[u8]) -> std::result::Result<Vec<u8>, MarkerError> {
    let payloads = icc::chunk(profile)?;
    let mut out = Vec::with_capacity(profile.len() + payloads.len() * (4 + icc::markers::CHUNK_HEADER_SIZE));
    for payload in payloads {
        let length = (payload.len() + 2) as u16;
        out.extend_from_slice(&[0xFF, APP2]);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// Insert APP2 ICC segments right after SOI.
pub fn embed_icc_profile(jpeg: &[u8], profile: &[u8]) -> Result<Vec<u8>> {
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != SOI {
        return Err(Error::Jpeg("Not a valid JPEG (missing SOI)".into()));
    }
    let segments = write_icc_segments(profile)?;
    let mut out = Vec::with_capacity(jpeg.len() + segments.len());
    out.extend_from_slice(&jpeg[..2]);
    out.extend(segments);
    out.extend_from_slice(&jpeg[2..]);
    Ok(out)
}

/// Header-only inspection: frame size, component count, color space and
/// embedded ICC profile.
pub fn inspect(data: &[u8]) -> Result<ImageInfo> {
    let segments = header_segments(data)?;

    let frame = segments
        .iter()
        .find(|s| is_sof(s.marker))
        .ok_or_else(|| Error::Jpeg("No frame header (SOFn) found".into()))?;
    if frame.data.len() < 6 {
        return Err(Error::Jpeg("Frame header too short".into()));
    }
    let height = u16::from_be_bytes([frame.data[1], frame.data[2]]) as u32;
    let width = u16::from_be_bytes([frame.data[3], frame.data[4]]) as u32;
    let num_components = frame.data[5];

    // Adobe APP14: "Adobe" + version(2) + flags0(2) + flags1(2) + transform(1)
    let adobe_transform = segments
        .iter()
        .find(|s| s.marker == APP14 && s.data.len() >= 12 && s.data.starts_with(b"Adobe"))
        .map(|s| s.data[11]);

    let color_space = match (num_components, adobe_transform) {
        (1, _) => JpegColorSpace::Grayscale,
        (3, Some(0)) => JpegColorSpace::Rgb,
        (3, _) => JpegColorSpace::YCbCr,
        (4, Some(2)) => JpegColorSpace::Ycck,
        (4, _) => JpegColorSpace::Cmyk,
        _ => JpegColorSpace::Unknown,
    };

    let app2: Vec<&[u8]> = segments
        .iter()
        .filter(|s| s.marker == APP2)
        .map(|s| s.data)
        .collect();
    let icc_profile = icc::reassemble(app2)?;
    debug!(
        width,
        height,
        num_components,
        icc_len = icc_profile.as_ref().map_or(0, Vec::len),
        "inspected JPEG header"
    );

    Ok(ImageInfo {
        width,
        height,
        num_components,
        color_space,
        icc_profile,
    })
}
