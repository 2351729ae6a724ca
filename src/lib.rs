//! # Seder Library
//!
//! Ingests binary sensor telemetry uploads into date-partitioned CSV files.
//!
//! An upload is decoded by [`protocol::decoder::decode_v0`] into a batch of
//! [`protocol::record::Record`]s, then appended by [`storage::SampleWriter`]
//! to `<data_dir>/<account>/<YYYY>/<MM>/<DD>/<HH>-<device>.dat`.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
