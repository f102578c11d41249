//! ICC profile chunking for JPEG APP2 markers.
//!
//! A profile larger than one marker segment is split across several APP2
//! segments. Each payload carries:
//!
//! ```text
//! "ICC_PROFILE\0"  12 bytes
//! sequence         1 byte, 1-based
//! total            1 byte
//! profile data     up to 65519 bytes
//! ```
//!
//! 65519 = 65535 (segment ceiling) - 2 (length field) - 14 (header).

use tracing::debug;

use super::error::MarkerError;

/// ICC profile APP2 identifier.
pub const ICC_IDENTIFIER: &[u8; 12] = b"ICC_PROFILE\0";

/// Identifier plus sequence and count bytes.
pub const CHUNK_HEADER_SIZE: usize = ICC_IDENTIFIER.len() + 2;

/// Largest profile slice carried by one marker.
pub const MAX_CHUNK_DATA: usize = 65535 - 2 - CHUNK_HEADER_SIZE;

/// The count field is one byte.
pub const MAX_CHUNKS: usize = 255;

/// One recognized ICC marker payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerChunk<'a> {
    pub sequence: u8,
    pub total: u8,
    pub payload: &'a [u8],
}

impl<'a> MarkerChunk<'a> {
    /// Parse a raw APP2 payload.
    ///
    /// Returns `Ok(None)` when the payload isn't ICC data at all (too short
    /// or a different APP2 identifier), which callers must skip rather than
    /// reject.
    pub fn parse(marker: &'a [u8]) -> Result<Option<Self>, MarkerError> {
        if marker.len() < CHUNK_HEADER_SIZE || !marker.starts_with(ICC_IDENTIFIER) {
            return Ok(None);
        }
        let sequence = marker[12];
        let total = marker[13];
        if sequence == 0 || sequence > total {
            return Err(MarkerError::InvalidSequence { sequence, total });
        }
        Ok(Some(Self {
            sequence,
            total,
            payload: &marker[CHUNK_HEADER_SIZE..],
        }))
    }

    /// Serialize back to an APP2 payload.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CHUNK_HEADER_SIZE + self.payload.len());
        out.extend_from_slice(ICC_IDENTIFIER);
        out.push(self.sequence);
        out.push(self.total);
        out.extend_from_slice(self.payload);
        out
    }
}

/// Number of markers needed for a profile of `len` bytes.
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(MAX_CHUNK_DATA)
}

/// Split an ICC profile into APP2-ready marker payloads.
///
/// Each returned buffer is a complete payload (identifier, sequence, count
/// and profile slice) in sequence order.
pub fn chunk(profile: &[u8]) -> Result<Vec<Vec<u8>>, MarkerError> {
    if profile.is_empty() {
        return Err(MarkerError::EmptyProfile);
    }

    let needed = chunk_count(profile.len());
    if needed > MAX_CHUNKS {
        return Err(MarkerError::TooManyChunks {
            needed,
            max: MAX_CHUNKS,
        });
    }
    let total = needed as u8;

    Ok(profile
        .chunks(MAX_CHUNK_DATA)
        .enumerate()
        .map(|(i, data)| {
            MarkerChunk {
                sequence: (i + 1) as u8,
                total,
                payload: data,
            }
            .to_payload()
        })
        .collect())
}

/// Reassemble an ICC profile from raw APP2 marker payloads.
///
/// Markers may arrive in any order. Returns `Ok(None)` when no marker
/// carries ICC data.
pub fn reassemble<I, M>(markers: I) -> Result<Option<Vec<u8>>, MarkerError>
where
    I: IntoIterator<Item = M>,
    M: AsRef<[u8]>,
{
    let markers: Vec<M> = markers.into_iter().collect();

    let mut chunks: Vec<MarkerChunk<'_>> = Vec::new();
    let mut expected: Option<u8> = None;

    for marker in &markers {
        let Some(chunk) = MarkerChunk::parse(marker.as_ref())? else {
            debug!(len = marker.as_ref().len(), "skipping non-ICC APP2 marker");
            continue;
        };
        match expected {
            None => expected = Some(chunk.total),
            Some(total) if total != chunk.total => {
                return Err(MarkerError::InconsistentCount {
                    expected: total,
                    found: chunk.total,
                });
            }
            Some(_) => {}
        }
        chunks.push(chunk);
    }

    let Some(expected) = expected else {
        return Ok(None);
    };
    if chunks.len() != expected as usize {
        return Err(MarkerError::MissingChunks {
            expected,
            found: chunks.len(),
        });
    }

    chunks.sort_by_key(|c| c.sequence);

    let mut profile = Vec::with_capacity(chunks.iter().map(|c| c.payload.len()).sum());
    for chunk in &chunks {
        profile.extend_from_slice(chunk.payload);
    }
    Ok(Some(profile))
}
