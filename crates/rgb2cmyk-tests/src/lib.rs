//! # rgb2cmyk-tests
//!
//! Integration test support for rgb2cmyk.
//!
//! This crate provides:
//! - Synthetic ICC headers and minimal JPEG containers ([`fixtures`])
//! - A fake image codec and a recording transform engine ([`fakes`])
//! - Access to real CMYK profiles under `testdata/profiles` ([`corpus`])
//!
//! Tests that need real profiles skip when the corpus isn't checked out.

pub mod corpus;
pub mod fakes;
pub mod fixtures;

pub use fakes::{EngineLog, FailAt, FakeCodec, RecordingEngine};
