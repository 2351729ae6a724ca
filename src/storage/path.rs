//! # Destination Paths
//!
//! Maps a record to `root/<account>/<YYYY>/<MM>/<DD>/<HH>-<device>.dat`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};

use crate::error::{Result, SederError};
use crate::protocol::record::Record;

/// Extension of sample files
pub const SAMPLE_FILE_EXTENSION: &str = "dat";

/// Compute the file a record belongs in
///
/// Only the account, device and UTC hour of `record` matter; two records that
/// agree on those always map to the same path.
///
/// # Errors
///
/// Returns `IoFailure` with kind `InvalidInput` if an identifier contains a
/// path separator or NUL byte and so cannot be used as a path component.
pub fn destination(root: &Path, record: &Record) -> Result<PathBuf> {
    let account = path_component(root, &record.account_id)?;
    let device = path_component(root, &record.device_id)?;

    let t = record.timestamp;
    let mut file_name = OsString::from(format!("{:02}-", t.hour()));
    file_name.push(device);
    file_name.push(".");
    file_name.push(SAMPLE_FILE_EXTENSION);

    Ok(root
        .join(account)
        .join(format!("{:04}", t.year()))
        .join(format!("{:02}", t.month()))
        .join(format!("{:02}", t.day()))
        .join(file_name))
}

fn path_component(root: &Path, id: &[u8]) -> Result<OsString> {
    if id.iter().any(|b| matches!(b, b'/' | b'\\' | 0)) {
        return Err(SederError::io(
            root,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("identifier \"{}\" is not a valid path component", id.escape_ascii()),
            ),
        ));
    }
    Ok(os_string(id))
}

#[cfg(unix)]
fn os_string(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
fn os_string(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(account: &[u8; 10], device: &[u8; 10], secs: i64) -> Record {
        Record {
            account_id: *account,
            device_id: *device,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            period_ms: 1000,
            values: vec![1, 2],
        }
    }

    #[test]
    fn test_destination_layout() {
        let r = record(b"ABCDEFGHIJ", b"aBK23o#OP@", 1_394_413_060);
        let path = destination(Path::new("/data"), &r).unwrap();
        assert_eq!(path, PathBuf::from("/data/ABCDEFGHIJ/2014/03/10/00-aBK23o#OP@.dat"));
    }

    #[test]
    fn test_destination_zero_pads_date_and_hour() {
        // 2001-02-03T04:05:06Z
        let r = record(b"ACCOUNT001", b"DEVICE0001", 981_173_106);
        let path = destination(Path::new("root"), &r).unwrap();
        assert_eq!(path, PathBuf::from("root/ACCOUNT001/2001/02/03/04-DEVICE0001.dat"));
    }

    #[test]
    fn test_destination_is_deterministic_within_hour() {
        let root = Path::new("/data");
        let mut a = record(b"ABCDEFGHIJ", b"aBK23o#OP@", 1_394_413_060);
        let mut b = record(b"ABCDEFGHIJ", b"aBK23o#OP@", 1_394_413_060 + 1000);
        a.values = vec![7];
        b.period_ms = 50;
        b.values = vec![-3, 4, 5];
        assert_eq!(destination(root, &a).unwrap(), destination(root, &b).unwrap());
    }

    #[test]
    fn test_destination_changes_with_hour() {
        let root = Path::new("/data");
        let a = record(b"ABCDEFGHIJ", b"aBK23o#OP@", 1_394_413_060);
        let b = record(b"ABCDEFGHIJ", b"aBK23o#OP@", 1_394_413_060 + 3600);
        assert_ne!(destination(root, &a).unwrap(), destination(root, &b).unwrap());
    }

    #[test]
    fn test_destination_keeps_padding_bytes() {
        let r = record(b"ACC       ", b"dev 1     ", 0);
        let path = destination(Path::new("/data"), &r).unwrap();
        assert_eq!(path, PathBuf::from("/data/ACC       /1970/01/01/00-dev 1     .dat"));
    }

    #[test]
    fn test_destination_rejects_separator() {
        let r = record(b"../../etc/", b"aBK23o#OP@", 0);
        match destination(Path::new("/data"), &r) {
            Err(SederError::IoFailure { path, source }) => {
                assert_eq!(path, PathBuf::from("/data"));
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("Expected IoFailure, got: {:?}", other),
        }
    }

    #[test]
    fn test_destination_rejects_nul_padding() {
        let r = record(b"ABCDEFGHIJ", b"dev\0\0\0\0\0\0\0", 0);
        assert!(destination(Path::new("/data"), &r).is_err());
    }
}
