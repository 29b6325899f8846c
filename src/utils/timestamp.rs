//! Recording start timestamps encoded in file names.

use crate::constants::{TIMESTAMP_FORMAT, TIMESTAMP_LEN};
use chrono::NaiveDateTime;
use std::path::Path;

/// Parse the recording start time from a file name.
///
/// Field recorders stamp files with `YYYYMMDD_HHMMSS` immediately before
/// the extension, e.g. `SITE01_20240601_053000.wav`. Returns `None` when
/// the name does not match; the caller degrades that file's metadata
/// rather than failing the batch.
pub fn recording_start(path: &Path) -> Option<NaiveDateTime> {
    let stem = path.file_stem()?.to_str()?;
    if stem.len() < TIMESTAMP_LEN {
        return None;
    }

    let split = stem.len() - TIMESTAMP_LEN;
    if !stem.is_char_boundary(split) {
        return None;
    }

    NaiveDateTime::parse_from_str(&stem[split..], TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_recording_start_with_site_prefix() {
        let parsed = recording_start(Path::new("SITE01_20240601_053000.wav")).unwrap();
        assert_eq!(
            parsed.date(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(parsed.hour(), 5);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn test_recording_start_bare_stamp() {
        let parsed = recording_start(Path::new("/data/20231115_235959.flac"));
        assert!(parsed.is_some());
    }

    #[test]
    fn test_recording_start_rejects_short_stem() {
        assert!(recording_start(Path::new("audio.wav")).is_none());
    }

    #[test]
    fn test_recording_start_rejects_non_numeric_stamp() {
        assert!(recording_start(Path::new("field_recording_one.wav")).is_none());
    }

    #[test]
    fn test_recording_start_rejects_invalid_date() {
        // Month 13 does not parse.
        assert!(recording_start(Path::new("SITE_20241301_120000.wav")).is_none());
    }

    #[test]
    fn test_recording_start_non_ascii_stem() {
        assert!(recording_start(Path::new("äänitys.wav")).is_none());
    }
}
