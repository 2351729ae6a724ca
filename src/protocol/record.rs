//! # V0 Upload Layout and Record Type
//!
//! Wire constants for the V0 upload format and the decoded sample record.
//!
//! ```text
//! TYPE       BYTES   FIELD
//! u8[10]     10      account id
//! u8[10]     10      device id
//! u32 LE      4      base unix time in seconds (t1)
//! u32 LE      4      delta time in milliseconds (t2)
//! i16 LE      2      sample period in milliseconds
//! i16 LE      2      number of samples (N)
//! u8          1      number of channels (C)
//! i16 LE    N*C*2    samples, row-major, channel order within a sample
//! ```

use chrono::{DateTime, Utc};

/// Width of the account and device identifiers
pub const ID_LEN: usize = 10;

/// Fixed header size of a V0 upload
pub const V0_HEADER_LEN: usize = 2 * ID_LEN + 4 + 4 + 2 + 2 + 1;

/// Size of a single encoded channel value
pub const V0_VALUE_LEN: usize = 2;

/// Largest legal V0 upload (i16::MAX samples of u8::MAX channels)
pub const V0_MAX_PAYLOAD_LEN: usize =
    V0_HEADER_LEN + i16::MAX as usize * u8::MAX as usize * V0_VALUE_LEN;

/// Fixed-width identifier as sent by the device.
///
/// Bytes are kept verbatim, padding and non-printable bytes included.
pub type Identifier = [u8; ID_LEN];

/// One measurement event decoded from an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Account the device reports under
    pub account_id: Identifier,

    /// Reporting device
    pub device_id: Identifier,

    /// Derived sample time
    pub timestamp: DateTime<Utc>,

    /// Sampling period in milliseconds
    pub period_ms: i16,

    /// One reading per channel
    pub values: Vec<i16>,
}

impl Record {
    /// Number of channels carried by this record
    pub fn channel_count(&self) -> usize {
        self.values.len()
    }
}

/// Fields shared by every record of one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V0Header {
    pub account_id: Identifier,
    pub device_id: Identifier,
    /// Base unix time in seconds
    pub base_time_s: u32,
    /// Offset added to the base time, in milliseconds
    pub delta_time_ms: u32,
    pub period_ms: i16,
    pub sample_count: i16,
    pub channel_count: u8,
}

impl V0Header {
    /// Milliseconds since the unix epoch of sample `index`
    pub fn sample_time_ms(&self, index: usize) -> i64 {
        self.base_time_s as i64 * 1000
            + self.delta_time_ms as i64
            + index as i64 * self.period_ms as i64
    }

    /// Length of the sample block this header declares
    ///
    /// Negative sample counts declare no samples.
    pub fn body_len(&self) -> usize {
        self.sample_count.max(0) as usize * self.channel_count as usize * V0_VALUE_LEN
    }
}
