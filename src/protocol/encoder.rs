//! # V0 Upload Encoder
//!
//! Builds V0 upload bodies the way a device would send them.

use bytes::BufMut;

use super::record::*;
use crate::error::{Result, SederError};

/// Encode a header and its sample rows into a V0 upload body
///
/// `header.sample_count` and `header.channel_count` must describe `samples`.
///
/// # Errors
///
/// Returns `MalformedPayload` if the row count differs from the declared
/// sample count, or a row's length differs from the declared channel count.
///
/// # Examples
///
/// ```
/// use seder::protocol::encoder::encode_v0;
/// use seder::protocol::record::{V0Header, V0_HEADER_LEN};
///
/// let header = V0Header {
///     account_id: *b"ABCDEFGHIJ",
///     device_id: *b"device0001",
///     base_time_s: 1_394_413_060,
///     delta_time_ms: 0,
///     period_ms: 1000,
///     sample_count: 2,
///     channel_count: 2,
/// };
/// let body = encode_v0(&header, &[vec![10, 20], vec![30, 40]])?;
/// assert_eq!(body.len(), V0_HEADER_LEN + 8);
/// # Ok::<(), seder::error::SederError>(())
/// ```
pub fn encode_v0(header: &V0Header, samples: &[Vec<i16>]) -> Result<Vec<u8>> {
    if header.sample_count < 0 || header.sample_count as usize != samples.len() {
        return Err(SederError::MalformedPayload(format!(
            "Header declares {} samples, got {}",
            header.sample_count,
            samples.len()
        )));
    }

    let channels = header.channel_count as usize;
    if let Some((index, row)) = samples.iter().enumerate().find(|(_, row)| row.len() != channels) {
        return Err(SederError::MalformedPayload(format!(
            "Sample {} has {} values, header declares {}",
            index,
            row.len(),
            channels
        )));
    }

    let mut body = Vec::with_capacity(V0_HEADER_LEN + header.body_len());
    body.put_slice(&header.account_id);
    body.put_slice(&header.device_id);
    body.put_u32_le(header.base_time_s);
    body.put_u32_le(header.delta_time_ms);
    body.put_i16_le(header.period_ms);
    body.put_i16_le(header.sample_count);
    body.put_u8(header.channel_count);

    for value in samples.iter().flatten() {
        body.put_i16_le(*value);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> V0Header {
        V0Header {
            account_id: *b"ABCDEFGHIJ",
            device_id: *b"aBK23o#OP@",
            base_time_s: 0x5316_1B04,
            delta_time_ms: 0x0000_DFEE,
            period_ms: 800,
            sample_count: 2,
            channel_count: 1,
        }
    }

    #[test]
    fn test_encode_header_layout() {
        let body = encode_v0(&header(), &[vec![-1], vec![258]]).unwrap();

        assert_eq!(body.len(), V0_HEADER_LEN + 4);
        assert_eq!(&body[0..10], b"ABCDEFGHIJ");
        assert_eq!(&body[10..20], b"aBK23o#OP@");
        assert_eq!(&body[20..24], &[0x04, 0x1B, 0x16, 0x53]);
        assert_eq!(&body[24..28], &[0xEE, 0xDF, 0x00, 0x00]);
        assert_eq!(&body[28..30], &[0x20, 0x03]); // 800
        assert_eq!(&body[30..32], &[0x02, 0x00]);
        assert_eq!(body[32], 1);
        assert_eq!(&body[33..35], &[0xFF, 0xFF]); // -1
        assert_eq!(&body[35..37], &[0x02, 0x01]); // 258
    }

    #[test]
    fn test_encode_sample_count_mismatch() {
        let result = encode_v0(&header(), &[vec![1]]);
        assert!(matches!(result, Err(SederError::MalformedPayload(_))));
    }

    #[test]
    fn test_encode_channel_count_mismatch() {
        let result = encode_v0(&header(), &[vec![1], vec![1, 2]]);
        match result {
            Err(SederError::MalformedPayload(msg)) => assert!(msg.contains("Sample 1")),
            other => panic!("Expected MalformedPayload, got: {:?}", other),
        }
    }

    #[test]
    fn test_encode_negative_sample_count() {
        let mut h = header();
        h.sample_count = -1;
        assert!(encode_v0(&h, &[]).is_err());
    }
}
