//! Real ICC profiles from the test corpus

use std::path::{Path, PathBuf};

/// CMYK output profiles in the corpus, relative to `testdata/profiles`
pub const CMYK_PROFILES: &[&str] = &[
    "skcms/misc/Coated_FOGRA39_CMYK.icc",
    "qcms/ps_cmyk_min.icc",
    "lcms2/test1.icc",
];

/// `testdata/` at the workspace root
pub fn testdata_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(|root| root.join("testdata"))
        .unwrap_or_else(|| PathBuf::from("testdata"))
}

/// Read a profile from `testdata/profiles`, printing `SKIP` when it isn't
/// available.
pub fn load_profile(rel: &str) -> Option<Vec<u8>> {
    let path = testdata_dir().join("profiles").join(rel);
    if !path.exists() {
        eprintln!("SKIP: {rel} (not found)");
        return None;
    }
    match std::fs::read(&path) {
        Ok(data) => Some(data),
        Err(e) => {
            eprintln!("SKIP: {rel} (read error: {e})");
            None
        }
    }
}

/// Every available CMYK profile, by name.
pub fn cmyk_profiles() -> Vec<(&'static str, Vec<u8>)> {
    CMYK_PROFILES
        .iter()
        .filter_map(|rel| load_profile(rel).map(|data| (*rel, data)))
        .collect()
}
