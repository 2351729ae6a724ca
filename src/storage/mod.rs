//! # Sample Storage Module
//!
//! Persists decoded batches as append-only CSV files.
//!
//! This module handles:
//! - Deriving `<account>/<YYYY>/<MM>/<DD>/<HH>-<device>.dat` destinations
//! - Formatting header and sample rows
//! - Appending batches with one header per file, serialized per file

pub mod path;
pub mod row;
pub mod writer;

pub use writer::SampleWriter;
