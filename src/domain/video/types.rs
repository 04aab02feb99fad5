// SPDX-License-Identifier: MPL-2.0
//! Core video record types for the domain layer.
//!
//! A [`VideoRecord`] is the persisted unit representing one captured video.
//! Its serialized field names (`id, name, size, type, data, uploadDate`) are
//! part of the storage slot format and must not change.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// MIME types accepted by capture. Anything else is skipped.
pub const SUPPORTED_MIME_TYPES: [&str; 4] =
    ["video/mp4", "video/webm", "video/mov", "video/avi"];

/// File extensions matching [`SUPPORTED_MIME_TYPES`], used to pre-filter the
/// native file picker. The MIME type is still re-validated after selection.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "avi"];

/// Identifier for one record, unique within the store at any time.
///
/// Derived from the capture timestamp in milliseconds plus a random
/// tie-breaker, so records captured within the same millisecond still get
/// distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a fresh id for a record captured now.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let tie_breaker: u16 = rand::rng().random();
        Self(format!("{millis}-{tie_breaker:04x}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The persisted unit: one captured video and its display metadata.
///
/// `size` and `upload_date` are formatted once at capture time and never
/// recomputed; `data` embeds the full file content as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: RecordId,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: String,
}

/// Maps a file extension to its MIME type, if the extension is supported.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    SUPPORTED_EXTENSIONS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(ext))
        .map(|index| SUPPORTED_MIME_TYPES[index])
}

/// Returns `true` if the MIME type is in the supported set.
#[must_use]
pub fn is_supported_mime(mime: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime)
}

/// Formats a byte count for display: 1024 base, at most two decimals,
/// trailing zeros trimmed (`2097152` becomes `"2 MB"`).
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).log2() / 10.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", trim_decimals(rounded), UNITS[exponent])
}

/// Formats an ISO-8601 capture timestamp as a short display date.
/// Falls back to the raw string if it does not parse.
#[must_use]
pub fn format_upload_date(iso: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(iso)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

/// Renders a value with up to two decimals, trimming trailing zeros.
fn trim_decimals(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> VideoRecord {
        VideoRecord {
            id: RecordId::from("1700000000000-00ff"),
            name: "clip.mp4".into(),
            size: "2 MB".into(),
            mime_type: "video/mp4".into(),
            data: "data:video/mp4;base64,AAAA".into(),
            upload_date: "2026-08-07T12:00:00.000Z".into(),
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_id_has_timestamp_prefix() {
        let id = RecordId::generate();
        let (prefix, suffix) = id.as_str().split_once('-').expect("dash separator");
        assert!(prefix.parse::<i64>().is_ok(), "prefix should be millis");
        assert_eq!(suffix.len(), 4, "tie-breaker is four hex digits");
    }

    #[test]
    fn serialized_field_names_match_slot_format() {
        let json = serde_json::to_value(sample_record()).expect("serialize");
        let object = json.as_object().expect("object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["data", "id", "name", "size", "type", "uploadDate"]
        );
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = sample_record();
        let json = serde_json::to_string(&record).expect("serialize");
        let back: VideoRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, back);
    }

    #[test]
    fn mime_for_path_maps_supported_extensions() {
        assert_eq!(mime_for_path(Path::new("a.mp4")), Some("video/mp4"));
        assert_eq!(mime_for_path(Path::new("a.WEBM")), Some("video/webm"));
        assert_eq!(mime_for_path(Path::new("a.mov")), Some("video/mov"));
        assert_eq!(mime_for_path(Path::new("a.avi")), Some("video/avi"));
    }

    #[test]
    fn mime_for_path_rejects_everything_else() {
        assert_eq!(mime_for_path(Path::new("slides.pdf")), None);
        assert_eq!(mime_for_path(Path::new("archive.mkv")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn supported_mime_check_matches_allow_list() {
        assert!(is_supported_mime("video/mp4"));
        assert!(!is_supported_mime("application/pdf"));
        assert!(!is_supported_mime("video/x-matroska"));
    }

    #[test]
    fn format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn format_file_size_exact_megabytes() {
        assert_eq!(format_file_size(2_097_152), "2 MB");
    }

    #[test]
    fn format_file_size_trims_trailing_zeros() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024), "1 KB");
    }

    #[test]
    fn format_file_size_keeps_two_decimals() {
        // 1,300,000 / 1,048,576 = 1.2397... -> 1.24 MB
        assert_eq!(format_file_size(1_300_000), "1.24 MB");
    }

    #[test]
    fn format_file_size_small_values_stay_bytes() {
        assert_eq!(format_file_size(512), "512 Bytes");
    }

    #[test]
    fn format_upload_date_parses_rfc3339() {
        assert_eq!(
            format_upload_date("2026-08-07T09:30:00.000Z"),
            "2026-08-07"
        );
    }

    #[test]
    fn format_upload_date_falls_back_to_raw() {
        assert_eq!(format_upload_date("yesterday"), "yesterday");
    }
}
