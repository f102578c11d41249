//! Conversion pipeline with fake collaborators
//!
//! Source-profile precedence, stage tagging of failures, and release of the
//! transform handle on every path.

use anyhow::Result;
use rgb2cmyk_core::icc::{self, IccError};
use rgb2cmyk_core::quant;
use rgb2cmyk_core::{
    ConversionOptions, Converter, Error, ErrorKind, JpegColorSpace, ProfileStatus, RenderIntent,
    Stage, jpeg,
};
use rgb2cmyk_tests::fakes::naive_cmyk;
use rgb2cmyk_tests::fixtures::{cmyk_header, gray_header, jpeg_with, read_dqt, rgb_header};
use rgb2cmyk_tests::{FailAt, FakeCodec, RecordingEngine};

fn converter() -> (Converter<FakeCodec, RecordingEngine>, RecordingEngine) {
    let engine = RecordingEngine::new();
    (Converter::new(FakeCodec::new(), engine.clone()), engine)
}

fn options() -> ConversionOptions {
    ConversionOptions::new(cmyk_header())
}

#[test]
fn test_override_ignores_gray_embedded() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(4, 2, 3, Some(&gray_header()));
    let override_profile = rgb_header();

    let result = conv.convert(&source, &options().with_source_profile(override_profile.clone()))?;
    assert_eq!((result.source_width, result.source_height), (4, 2));
    assert_eq!(engine.log().sources, vec![override_profile]);
    Ok(())
}

#[test]
fn test_override_ignores_malformed_embedded() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(4, 2, 3, Some(b"this is not an ICC profile"));
    let override_profile = rgb_header();

    conv.convert(&source, &options().with_source_profile(override_profile.clone()))?;
    assert_eq!(engine.log().sources, vec![override_profile]);
    Ok(())
}

#[test]
fn test_gray_embedded_falls_back_to_default() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(3, 3, 1, Some(&gray_header()));

    let result = conv.convert(&source, &options())?;
    assert_eq!((result.source_width, result.source_height), (3, 3));
    assert_eq!(engine.log().sources, vec![icc::default_rgb_profile().to_vec()]);
    Ok(())
}

#[test]
fn test_no_profile_falls_back_to_default() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(5, 1, 3, None);

    conv.convert(&source, &options())?;
    assert_eq!(engine.log().sources, vec![icc::default_rgb_profile().to_vec()]);
    Ok(())
}

#[test]
fn test_embedded_rgb_profile_is_used() -> Result<()> {
    let (conv, engine) = converter();
    let embedded = rgb_header();
    let source = jpeg_with(2, 2, 3, Some(&embedded));

    conv.convert(&source, &options().with_intent(RenderIntent::Saturation))?;
    let log = engine.log();
    assert_eq!(log.sources, vec![embedded]);
    assert_eq!(log.intents, vec![RenderIntent::Saturation]);
    Ok(())
}

#[test]
fn test_output_carries_destination_profile_and_tables() -> Result<()> {
    let (conv, engine) = converter();
    let destination = cmyk_header();
    let source = jpeg_with(8, 8, 3, None);

    let result = conv.convert(&source, &options().with_quality(90).with_cmy_reduction(20))?;

    let info = jpeg::inspect(&result.encoded_bytes)?;
    assert_eq!((info.width, info.height), (8, 8));
    assert_eq!(info.num_components, 4);
    assert_eq!(info.color_space, JpegColorSpace::Cmyk);
    assert_eq!(info.icc_profile, Some(destination));

    let tables = read_dqt(&result.encoded_bytes);
    let expected = quant::generate(90, 20);
    assert_eq!(tables, vec![(0, expected.cmy.values), (1, expected.k.values)]);

    let log = engine.log();
    assert_eq!((log.created, log.released), (1, 1));
    Ok(())
}

#[test]
fn test_transform_only() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(4, 4, 3, None);

    let image = conv.transform(&source, &options())?;
    assert_eq!((image.width(), image.height()), (4, 4));
    // Bottom-left of the fake gradient is (0, 255, 128)
    assert_eq!(image.as_cmyk()[12], naive_cmyk([0, 255, 128]));
    assert_eq!(engine.log().released, 1);
    assert!(conv.codec().last_encode().is_none());
    Ok(())
}

#[test]
fn test_encode_only() -> Result<()> {
    let (conv, _) = converter();
    let image = rgb2cmyk_core::CmykImage::new(2, 1, vec![0, 0, 0, 255, 255, 0, 0, 0])?;

    let bytes = conv.encode(&image, None, 75, 15)?;
    assert_eq!(jpeg::extract_icc_profile(&bytes)?, None);

    let call = conv.codec().last_encode().expect("encode was called");
    assert_eq!(call.tables, quant::generate(75, 15));
    assert_eq!((call.width, call.height), (2, 1));
    Ok(())
}

#[test]
fn test_invalid_destination_is_profile_resolution_error() {
    let (conv, engine) = converter();
    let source = jpeg_with(2, 2, 3, None);

    let err = conv
        .convert(&source, &ConversionOptions::new(vec![0u8; 127]))
        .unwrap_err();
    assert_eq!(err.stage, Stage::ProfileResolution);
    assert!(matches!(err.error, Error::Icc(IccError::TooShort { .. })));
    assert_eq!(engine.log().created, 0);
}

#[test]
fn test_decode_failure() {
    let engine = RecordingEngine::new();
    let conv = Converter::new(FakeCodec::failing(FailAt::Decode), engine.clone());

    let err = conv.convert(&jpeg_with(2, 2, 3, None), &options()).unwrap_err();
    assert_eq!(err.stage, Stage::Decode);
    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert_eq!(engine.log().created, 0);
}

#[test]
fn test_broken_embedded_markers_fail_decode() {
    let (conv, _) = converter();
    let mut source = jpeg_with(2, 2, 3, Some(&rgb_header()));
    // Claim two chunks when only one is present
    let icc_at = source.windows(12).position(|w| w == b"ICC_PROFILE\0").unwrap();
    source[icc_at + 13] = 2;

    let err = conv.convert(&source, &options()).unwrap_err();
    assert_eq!(err.stage, Stage::Decode);
}

#[test]
fn test_create_failure_has_nothing_to_release() {
    let engine = RecordingEngine::failing(FailAt::Create);
    let conv = Converter::new(FakeCodec::new(), engine.clone());

    let err = conv.convert(&jpeg_with(2, 2, 3, None), &options()).unwrap_err();
    assert_eq!(err.stage, Stage::Transform);
    let log = engine.log();
    assert_eq!((log.created, log.released), (0, 0));
}

#[test]
fn test_apply_failure_releases_handle() {
    let engine = RecordingEngine::failing(FailAt::Apply);
    let conv = Converter::new(FakeCodec::new(), engine.clone());

    let err = conv.convert(&jpeg_with(2, 2, 3, None), &options()).unwrap_err();
    assert_eq!(err.stage, Stage::Transform);
    assert_eq!(err.kind(), ErrorKind::Collaborator);
    let log = engine.log();
    assert_eq!((log.created, log.released), (1, 1));
}

#[test]
fn test_encode_failure_releases_handle() {
    let engine = RecordingEngine::new();
    let conv = Converter::new(FakeCodec::failing(FailAt::Encode), engine.clone());

    let err = conv.convert(&jpeg_with(2, 2, 3, None), &options()).unwrap_err();
    assert_eq!(err.stage, Stage::Encode);
    assert!(err.to_string().starts_with("encode: "));
    let log = engine.log();
    assert_eq!((log.created, log.released), (1, 1));
}

#[test]
fn test_repeated_conversions_do_not_leak_handles() -> Result<()> {
    let (conv, engine) = converter();
    let source = jpeg_with(3, 2, 3, Some(&rgb_header()));
    for _ in 0..10 {
        conv.convert(&source, &options())?;
    }
    let log = engine.log();
    assert_eq!((log.created, log.released), (10, 10));
    Ok(())
}

#[test]
fn test_identify() -> Result<()> {
    let (conv, _) = converter();

    let id = conv.identify(&jpeg_with(640, 480, 3, Some(&cmyk_header())))?;
    assert_eq!(id.info.color_space, JpegColorSpace::YCbCr);
    assert!(matches!(id.profile, ProfileStatus::Valid { len: 128, .. }));
    let text = id.to_string();
    assert!(text.contains("Dimensions: 640 x 480"));
    assert!(text.contains("  Class:       Output"));

    let id = conv.identify(&jpeg_with(10, 10, 1, Some(b"garbage")))?;
    assert_eq!(id.info.color_space, JpegColorSpace::Grayscale);
    assert!(matches!(
        id.profile,
        ProfileStatus::Invalid {
            len: 7,
            error: IccError::TooShort { .. }
        }
    ));

    let id = conv.identify(&jpeg_with(10, 10, 3, None))?;
    assert_eq!(id.profile, ProfileStatus::Absent);
    assert!(id.to_string().ends_with("ICC profile: none"));
    Ok(())
}

#[test]
fn test_options_from_json() -> Result<()> {
    let mut opts: ConversionOptions =
        serde_json::from_str(r#"{"quality": 95, "cmy_quality_reduction": 5, "render_intent": "relative"}"#)?;
    assert!(opts.validate().is_err());

    opts.destination_profile = cmyk_header();
    let (conv, engine) = converter();
    conv.convert(&jpeg_with(2, 2, 3, None), &opts)?;
    assert_eq!(engine.log().intents, vec![RenderIntent::RelativeColorimetric]);
    assert_eq!(conv.codec().last_encode().unwrap().tables, quant::generate(95, 5));
    Ok(())
}

#[test]
fn test_unknown_intent_name() {
    let err = "vivid".parse::<RenderIntent>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}
