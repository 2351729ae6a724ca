//! # V0 Upload Decoder
//!
//! Turns a raw upload body into timestamped sample records.

use bytes::Buf;
use chrono::DateTime;

use super::record::*;
use crate::error::{Result, SederError};

/// Decode a complete V0 upload
///
/// # Arguments
///
/// * `payload` - Raw request body, exactly as received
///
/// # Returns
///
/// * `Result<Vec<Record>>` - One record per declared sample, in upload order
///
/// # Errors
///
/// Returns `MalformedPayload` if:
/// - The fixed 33-byte header is incomplete
/// - The declared sample count is negative
/// - The sample block is shorter than `sample_count * channel_count * 2` bytes
///
/// Trailing bytes after the declared sample block are ignored.
///
/// # Examples
///
/// ```
/// use seder::protocol::decoder::decode_v0;
///
/// assert!(decode_v0(&[]).is_err());
/// ```
pub fn decode_v0(payload: &[u8]) -> Result<Vec<Record>> {
    let mut buf = payload;
    let header = decode_v0_header(&mut buf)?;

    if header.sample_count < 0 {
        return Err(SederError::MalformedPayload(format!(
            "Negative sample count: {}",
            header.sample_count
        )));
    }

    // The whole sample block must be present before any record is allocated.
    let body_len = header.body_len();
    if buf.remaining() < body_len {
        return Err(SederError::MalformedPayload(format!(
            "Sample block too short: expected {} bytes, got {}",
            body_len,
            buf.remaining()
        )));
    }

    let sample_count = header.sample_count as usize;
    let channel_count = header.channel_count as usize;
    let mut records = Vec::with_capacity(sample_count);

    for index in 0..sample_count {
        let millis = header.sample_time_ms(index);
        let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            SederError::MalformedPayload(format!(
                "Sample {} time out of range: {} ms",
                index, millis
            ))
        })?;

        let mut values = Vec::with_capacity(channel_count);
        for _ in 0..channel_count {
            values.push(read_i16(&mut buf, "sample value")?);
        }

        records.push(Record {
            account_id: header.account_id,
            device_id: header.device_id,
            timestamp,
            period_ms: header.period_ms,
            values,
        });
    }

    Ok(records)
}

/// Decode the fixed V0 header, advancing `buf` past it
///
/// # Errors
///
/// Returns `MalformedPayload` naming the first field that runs past the end
/// of the buffer.
pub fn decode_v0_header(buf: &mut &[u8]) -> Result<V0Header> {
    let account_id = read_identifier(buf, "account id")?;
    let device_id = read_identifier(buf, "device id")?;

    ensure_remaining(buf, 4, "base time")?;
    let base_time_s = buf.get_u32_le();

    ensure_remaining(buf, 4, "delta time")?;
    let delta_time_ms = buf.get_u32_le();

    let period_ms = read_i16(buf, "sample period")?;
    let sample_count = read_i16(buf, "sample count")?;

    ensure_remaining(buf, 1, "channel count")?;
    let channel_count = buf.get_u8();

    Ok(V0Header {
        account_id,
        device_id,
        base_time_s,
        delta_time_ms,
        period_ms,
        sample_count,
        channel_count,
    })
}

fn read_identifier(buf: &mut &[u8], field: &str) -> Result<Identifier> {
    ensure_remaining(buf, ID_LEN, field)?;
    let mut id = [0u8; ID_LEN];
    buf.copy_to_slice(&mut id);
    Ok(id)
}

fn read_i16(buf: &mut &[u8], field: &str) -> Result<i16> {
    ensure_remaining(buf, V0_VALUE_LEN, field)?;
    Ok(buf.get_i16_le())
}

fn ensure_remaining(buf: &&[u8], needed: usize, field: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(SederError::MalformedPayload(format!(
            "Truncated {}: need {} bytes, {} left",
            field,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}
