//! # Upload Protocol Module
//!
//! Binary upload format sent by sensor devices.
//!
//! This module handles:
//! - V0 layout constants and the decoded `Record` type
//! - Decoding upload bodies into timestamped records
//! - Encoding upload bodies (device simulators and tests)

pub mod record;
pub mod decoder;
pub mod encoder;
