//! Synthetic profiles and JPEG containers

use rgb2cmyk_core::jpeg;

/// A bare 128-byte ICC header.
///
/// `version` is `(major, minor << 4 | bugfix)` as stored at offsets 8 and 9.
pub fn icc_header(class: &[u8; 4], space: &[u8; 4], pcs: &[u8; 4], version: (u8, u8)) -> Vec<u8> {
    let mut data = vec![0u8; 128];
    data[0..4].copy_from_slice(&128u32.to_be_bytes());
    data[8] = version.0;
    data[9] = version.1;
    data[12..16].copy_from_slice(class);
    data[16..20].copy_from_slice(space);
    data[20..24].copy_from_slice(pcs);
    data[36..40].copy_from_slice(b"acsp");
    data
}

/// Printer-class CMYK header, v2.1.0
pub fn cmyk_header() -> Vec<u8> {
    icc_header(b"prtr", b"CMYK", b"Lab ", (2, 0x10))
}

/// Display-class grayscale header, v4.3.0
pub fn gray_header() -> Vec<u8> {
    icc_header(b"mntr", b"GRAY", b"XYZ ", (4, 0x30))
}

/// Display-class RGB header, v2.1.0
pub fn rgb_header() -> Vec<u8> {
    icc_header(b"mntr", b"RGB ", b"XYZ ", (2, 0x10))
}

/// Deterministic pseudo-profile bytes of any length.
pub fn profile_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31) % 251) as u8).collect()
}

pub fn segment(marker: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(data);
    out
}

/// Baseline frame header with 1x1 sampling for every component.
pub fn sof0(width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut data = vec![8];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(components);
    for id in 1..=components {
        let table = if components == 4 && id == 4 { 1 } else { 0 };
        data.extend_from_slice(&[id, 0x11, table]);
    }
    segment(0xC0, &data)
}

/// A JPEG container with headers only: SOI, optional ICC, frame, an empty
/// scan, EOI. Enough for header inspection and for [`crate::FakeCodec`].
pub fn jpeg_with(width: u16, height: u16, components: u8, icc: Option<&[u8]>) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    if let Some(profile) = icc {
        out.extend(jpeg::write_icc_segments(profile).expect("profile fits in APP2 markers"));
    }
    out.extend(sof0(width, height, components));
    out.extend(segment(0xDA, &[1, 1, 0, 0, 63, 0]));
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// 8-bit quantization tables from the DQT segments of a JPEG, by table id.
pub fn read_dqt(data: &[u8]) -> Vec<(u8, [u16; 64])> {
    let mut tables = Vec::new();
    for seg in jpeg::header_segments(data).expect("valid JPEG headers") {
        if seg.marker != 0xDB {
            continue;
        }
        for entry in seg.data.chunks(65) {
            let mut values = [0u16; 64];
            for (v, &b) in values.iter_mut().zip(&entry[1..]) {
                *v = b as u16;
            }
            tables.push((entry[0] & 0x0F, values));
        }
    }
    tables
}
