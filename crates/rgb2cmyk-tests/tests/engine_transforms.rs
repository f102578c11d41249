//! RGB → CMYK Engine Tests
//!
//! Runs the moxcms and lcms2 engines against the CMYK profiles in the test
//! corpus. Profiles that aren't checked out are skipped. The bundled sRGB
//! tests always run.

use rgb2cmyk_core::icc::default_rgb_profile;
use rgb2cmyk_core::transform::acquire;
use rgb2cmyk_core::{
    ColorTransformEngine, ConversionOptions, Converter, Error, ErrorKind, Lcms2Engine,
    MoxcmsEngine, RenderIntent, Stage, TransformHandle, jpeg,
};
use rgb2cmyk_tests::corpus;
use rgb2cmyk_tests::fakes::FakeCodec;
use rgb2cmyk_tests::fixtures::jpeg_with;

const SWATCHES: [[u8; 3]; 6] = [
    [255, 255, 255],
    [0, 0, 0],
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [128, 128, 128],
];

fn swatch_buffer() -> Vec<u8> {
    SWATCHES.concat()
}

fn run_engine<E: ColorTransformEngine>(engine: &E, name: &str, profile: &[u8]) -> Option<Vec<u8>> {
    let guard = match acquire(engine, default_rgb_profile(), profile, RenderIntent::Perceptual) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("SKIP: {name} ({e})");
            return None;
        }
    };
    let cmyk = guard
        .apply(&swatch_buffer(), SWATCHES.len() as u32, 1)
        .unwrap_or_else(|e| panic!("{name}: apply failed: {e}"));
    assert_eq!(cmyk.len(), SWATCHES.len() * 4, "{name}");
    Some(cmyk)
}

fn check_extremes(name: &str, cmyk: &[u8]) {
    let white = &cmyk[0..4];
    let black = &cmyk[4..8];
    eprintln!("{name}: white={white:?} black={black:?}");

    let ink = |px: &[u8]| px.iter().map(|&v| v as u32).sum::<u32>();
    assert!(
        ink(black) > ink(white),
        "{name}: black should carry more ink than white"
    );
}

#[test]
fn test_moxcms_srgb_to_cmyk() {
    eprintln!("\n=== moxcms sRGB -> CMYK ===\n");

    for (name, profile) in corpus::cmyk_profiles() {
        if let Some(cmyk) = run_engine(&MoxcmsEngine::default(), name, &profile) {
            check_extremes(name, &cmyk);
        }
    }
}

#[test]
fn test_lcms2_srgb_to_cmyk() {
    eprintln!("\n=== lcms2 sRGB -> CMYK ===\n");

    for (name, profile) in corpus::cmyk_profiles() {
        if let Some(cmyk) = run_engine(&Lcms2Engine, name, &profile) {
            check_extremes(name, &cmyk);
        }
    }
}

/// Reports how far the two engines are apart.
#[test]
fn test_engine_agreement() {
    eprintln!("\n=== moxcms vs lcms2 ===\n");

    for (name, profile) in corpus::cmyk_profiles() {
        let (Some(mox), Some(lcms)) = (
            run_engine(&MoxcmsEngine::default(), name, &profile),
            run_engine(&Lcms2Engine, name, &profile),
        ) else {
            continue;
        };

        for (i, rgb) in SWATCHES.iter().enumerate() {
            let a = &mox[i * 4..i * 4 + 4];
            let b = &lcms[i * 4..i * 4 + 4];
            let max_diff = a
                .iter()
                .zip(b)
                .map(|(&x, &y)| x.abs_diff(y))
                .max()
                .unwrap_or(0);
            eprintln!("{name} {rgb:?}: moxcms={a:?} lcms2={b:?} max_diff={max_diff}");
        }
    }
}

#[test]
fn test_release_after_use() {
    let Some((name, profile)) = corpus::cmyk_profiles().into_iter().next() else {
        eprintln!("SKIP: no CMYK profiles");
        return;
    };

    let engine = MoxcmsEngine::default();
    let Ok(mut handle) = engine.create(default_rgb_profile(), &profile, RenderIntent::Perceptual)
    else {
        eprintln!("SKIP: {name} (moxcms rejected profile)");
        return;
    };
    assert!(handle.apply(&[10, 20, 30], 1, 1).is_ok());
    handle.release();
    handle.release();
    assert!(handle.apply(&[10, 20, 30], 1, 1).is_err());
}

#[test]
fn test_buffer_size_mismatch_is_rejected() {
    let Some((_, profile)) = corpus::cmyk_profiles().into_iter().next() else {
        eprintln!("SKIP: no CMYK profiles");
        return;
    };

    if let Ok(handle) = MoxcmsEngine::default().create(
        default_rgb_profile(),
        &profile,
        RenderIntent::RelativeColorimetric,
    ) {
        assert!(handle.apply(&[0u8; 10], 2, 2).is_err());
    }
    if let Ok(handle) = Lcms2Engine.create(
        default_rgb_profile(),
        &profile,
        RenderIntent::RelativeColorimetric,
    ) {
        assert!(handle.apply(&[0u8; 10], 2, 2).is_err());
    }
}

/// Full conversion with a real engine and profile
#[test]
fn test_convert_with_moxcms() {
    for (name, profile) in corpus::cmyk_profiles() {
        let converter = Converter::with_moxcms(FakeCodec::new());
        let options = ConversionOptions::new(profile.clone());

        match converter.convert(&jpeg_with(16, 16, 3, None), &options) {
            Ok(result) => {
                assert_eq!((result.source_width, result.source_height), (16, 16));
                assert_eq!(
                    jpeg::extract_icc_profile(&result.encoded_bytes).unwrap(),
                    Some(profile),
                    "{name}"
                );
            }
            Err(e) if moxcms::ColorProfile::new_from_slice(&profile).is_ok() => {
                panic!("{name}: conversion failed with a profile moxcms accepts: {e}")
            }
            Err(e) => eprintln!("SKIP: {name} ({e})"),
        }
    }
}

#[test]
fn test_moxcms_handle_lifecycle_with_bundled_profile() {
    let srgb = default_rgb_profile();
    let engine = MoxcmsEngine::default();

    let mut handle = engine
        .create(srgb, srgb, RenderIntent::Perceptual)
        .expect("moxcms accepts the bundled sRGB profile");
    let out = handle.apply(&swatch_buffer(), SWATCHES.len() as u32, 1).unwrap();
    assert_eq!(out.len(), SWATCHES.len() * 4);

    let white = &out[0..3];
    let black = &out[4..7];
    assert!(white.iter().all(|&v| v >= 250), "white={white:?}");
    assert!(black.iter().all(|&v| v <= 5), "black={black:?}");

    handle.release();
    handle.release();
    assert!(handle.apply(&swatch_buffer(), SWATCHES.len() as u32, 1).is_err());
}

#[test]
fn test_moxcms_buffer_mismatch_is_usage_error() {
    let srgb = default_rgb_profile();
    let guard = acquire(&MoxcmsEngine::default(), srgb, srgb, RenderIntent::Perceptual).unwrap();

    let err = Error::from(guard.apply(&[0u8; 10], 2, 2).unwrap_err());
    assert!(matches!(err, Error::BufferSize { expected: 12, actual: 10 }));
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_convert_with_bundled_profile() {
    let converter = Converter::with_moxcms(FakeCodec::new());
    let options = ConversionOptions::new(default_rgb_profile().to_vec());

    let result = converter
        .convert(&jpeg_with(16, 8, 3, None), &options)
        .unwrap();
    assert_eq!((result.source_width, result.source_height), (16, 8));

    let info = jpeg::inspect(&result.encoded_bytes).unwrap();
    assert_eq!(info.num_components, 4);
    assert_eq!(info.icc_profile.as_deref(), Some(default_rgb_profile()));
}

#[test]
fn test_moxcms_rejects_unusable_destination() {
    let converter = Converter::with_moxcms(FakeCodec::new());
    // Valid header, but no tags for the engine to build a transform from
    let options = ConversionOptions::new(rgb2cmyk_tests::fixtures::cmyk_header());

    let err = converter
        .convert(&jpeg_with(4, 4, 3, None), &options)
        .unwrap_err();
    assert_eq!(err.stage, Stage::Transform);
    assert_eq!(err.kind(), ErrorKind::Collaborator);
}
