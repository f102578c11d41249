//! Collaborator doubles for pipeline tests
//!
//! [`FakeCodec`] understands the header-only containers built by
//! [`crate::fixtures`]: "decoding" reads the frame size and embedded profile
//! and synthesizes a gradient, "encoding" writes DQT/SOF headers and the
//! ICC markers so results can be inspected with the `jpeg` helpers.
//! [`RecordingEngine`] counts handle creation and release and records which
//! source profile each transform was built from.

use std::sync::{Arc, Mutex, MutexGuard};

use rgb2cmyk_core::{
    BoxError, CmykImage, ColorTransformEngine, DecodedImage, ImageCodec, ImageInfo, QuantTables,
    RenderIntent, TransformHandle, jpeg,
};
use thiserror::Error;

use crate::fixtures::{segment, sof0};

/// Where a fake collaborator should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Decode,
    Create,
    Apply,
    Encode,
}

#[derive(Debug, Error)]
pub enum FakeError {
    #[error("fake {0:?} failure")]
    Requested(FailAt),
    #[error("fake codec: {0}")]
    Container(#[from] rgb2cmyk_core::Error),
}

/// The arguments of the last `encode` call
#[derive(Debug, Clone)]
pub struct EncodeCall {
    pub width: u32,
    pub height: u32,
    pub tables: QuantTables,
    pub icc: Option<Vec<u8>>,
}

#[derive(Default)]
pub struct FakeCodec {
    pub fail: Option<FailAt>,
    last_encode: Mutex<Option<EncodeCall>>,
}

impl FakeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(at: FailAt) -> Self {
        Self {
            fail: Some(at),
            ..Self::default()
        }
    }

    pub fn last_encode(&self) -> Option<EncodeCall> {
        self.last_encode.lock().unwrap().clone()
    }
}

impl ImageCodec for FakeCodec {
    fn decode(&self, data: &[u8]) -> Result<DecodedImage, BoxError> {
        if self.fail == Some(FailAt::Decode) {
            return Err(FakeError::Requested(FailAt::Decode).into());
        }
        let info = jpeg::inspect(data).map_err(FakeError::from)?;
        let (w, h) = (info.width as usize, info.height as usize);

        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let r = (x * 255 / w.max(2).saturating_sub(1).max(1)) as u8;
                let g = (y * 255 / h.max(2).saturating_sub(1).max(1)) as u8;
                pixels.extend_from_slice(&[r, g, 128]);
            }
        }

        Ok(DecodedImage {
            width: info.width,
            height: info.height,
            pixels,
            icc_profile: info.icc_profile,
        })
    }

    fn encode(
        &self,
        image: &CmykImage,
        tables: &QuantTables,
        icc_profile: Option<&[u8]>,
    ) -> Result<Vec<u8>, BoxError> {
        if self.fail == Some(FailAt::Encode) {
            return Err(FakeError::Requested(FailAt::Encode).into());
        }
        *self.last_encode.lock().unwrap() = Some(EncodeCall {
            width: image.width(),
            height: image.height(),
            tables: *tables,
            icc: icc_profile.map(<[u8]>::to_vec),
        });

        let mut out = vec![0xFF, 0xD8];
        if let Some(profile) = icc_profile {
            out.extend(jpeg::write_icc_segments(profile)?);
        }
        let mut dqt = Vec::with_capacity(130);
        for (id, table) in [(0u8, &tables.cmy), (1, &tables.k)] {
            dqt.push(id);
            dqt.extend(table.values.iter().map(|&v| v as u8));
        }
        out.extend(segment(0xDB, &dqt));
        out.extend(sof0(image.width() as u16, image.height() as u16, 4));
        out.extend(segment(0xDA, &[4, 1, 0, 2, 0, 3, 0, 4, 0, 0, 63, 0]));
        out.extend_from_slice(&[0xFF, 0xD9]);
        Ok(out)
    }

    fn inspect(&self, data: &[u8]) -> Result<ImageInfo, BoxError> {
        Ok(jpeg::inspect(data).map_err(FakeError::from)?)
    }
}

/// What a [`RecordingEngine`] has seen
#[derive(Debug, Default)]
pub struct EngineLog {
    pub created: usize,
    pub released: usize,
    pub sources: Vec<Vec<u8>>,
    pub intents: Vec<RenderIntent>,
}

/// Engine double producing a naive CMYK separation.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    pub fail: Option<FailAt>,
    log: Arc<Mutex<EngineLog>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(at: FailAt) -> Self {
        Self {
            fail: Some(at),
            ..Self::default()
        }
    }

    pub fn log(&self) -> MutexGuard<'_, EngineLog> {
        self.log.lock().unwrap()
    }
}

pub struct RecordingHandle {
    fail_apply: bool,
    live: bool,
    log: Arc<Mutex<EngineLog>>,
}

impl ColorTransformEngine for RecordingEngine {
    type Handle = RecordingHandle;

    fn create(
        &self,
        source_profile: &[u8],
        _destination_profile: &[u8],
        intent: RenderIntent,
    ) -> Result<RecordingHandle, BoxError> {
        if self.fail == Some(FailAt::Create) {
            return Err(FakeError::Requested(FailAt::Create).into());
        }
        let mut log = self.log.lock().unwrap();
        log.created += 1;
        log.sources.push(source_profile.to_vec());
        log.intents.push(intent);
        Ok(RecordingHandle {
            fail_apply: self.fail == Some(FailAt::Apply),
            live: true,
            log: Arc::clone(&self.log),
        })
    }
}

/// Textbook RGB → CMYK with full black generation.
pub fn naive_cmyk([r, g, b]: [u8; 3]) -> [u8; 4] {
    let k = 255 - r.max(g).max(b);
    if k == 255 {
        return [0, 0, 0, 255];
    }
    let ink = |v: u8| ((255 - v - k) as u32 * 255 / (255 - k) as u32) as u8;
    [ink(r), ink(g), ink(b), k]
}

impl TransformHandle for RecordingHandle {
    fn apply(&self, rgb: &[u8], _width: u32, _height: u32) -> Result<Vec<u8>, BoxError> {
        if self.fail_apply {
            return Err(FakeError::Requested(FailAt::Apply).into());
        }
        Ok(rgb
            .chunks_exact(3)
            .flat_map(|p| naive_cmyk([p[0], p[1], p[2]]))
            .collect())
    }

    fn release(&mut self) {
        if self.live {
            self.live = false;
            self.log.lock().unwrap().released += 1;
        }
    }
}
