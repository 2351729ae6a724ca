//! # Sample File Rows
//!
//! Header and data rows of a sample file. Identifier bytes are written
//! verbatim; quoting follows standard CSV rules.

use chrono::{DateTime, SecondsFormat, Utc};
use csv::ByteRecord;

use crate::protocol::record::Record;

/// Fixed leading columns of every sample file
pub const FIXED_COLUMNS: [&str; 4] = ["account", "device", "time", "period"];

/// Header row for a file holding `channel_count` channels
///
/// `account,device,time,period,A0,A1,...`
pub fn header_row(channel_count: usize) -> ByteRecord {
    let mut row = ByteRecord::with_capacity(32, FIXED_COLUMNS.len() + channel_count);
    for column in FIXED_COLUMNS {
        row.push_field(column.as_bytes());
    }
    for channel in 0..channel_count {
        row.push_field(format!("A{}", channel).as_bytes());
    }
    row
}

/// Data row for one record
pub fn sample_row(record: &Record) -> ByteRecord {
    let mut row = ByteRecord::with_capacity(64, FIXED_COLUMNS.len() + record.values.len());
    row.push_field(&record.account_id);
    row.push_field(&record.device_id);
    row.push_field(format_timestamp(&record.timestamp).as_bytes());
    row.push_field(record.period_ms.to_string().as_bytes());
    for value in &record.values {
        row.push_field(value.to_string().as_bytes());
    }
    row
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2014-03-10T00:57:40.000Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
