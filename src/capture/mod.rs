// SPDX-License-Identifier: MPL-2.0
//! Converts picked or dropped files into video records.
//!
//! Each candidate file is an independent unit of work: the MIME type is
//! derived from the extension and re-validated against the allow-list, the
//! content is read asynchronously and base64-encoded into a data URL, and
//! the finished [`VideoRecord`] is handed back to the update loop. Rejected
//! candidates (unsupported type, read failure) surface as [`CaptureError`]
//! and are skipped with a diagnostic; they never abort the batch.

use crate::domain::video::{
    self, data_url, format_file_size, is_supported_mime, mime_for_path, RecordId, VideoRecord,
};
use crate::error::CaptureError;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Returns `true` if the path carries a supported video extension.
///
/// Used to pre-filter drops before spawning a read task; the capture itself
/// re-validates.
#[must_use]
pub fn is_candidate(path: &Path) -> bool {
    mime_for_path(path).is_some()
}

/// Reads one candidate file and produces its record.
///
/// The record's `size` and `uploadDate` are formatted here, once; they are
/// never recomputed later.
pub async fn capture_file(path: PathBuf) -> Result<VideoRecord, CaptureError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let Some(mime) = mime_for_path(&path).filter(|mime| is_supported_mime(mime)) else {
        return Err(CaptureError::UnsupportedType {
            name,
            mime: guess_foreign_mime(&path),
        });
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| CaptureError::Read {
        name: name.clone(),
        message: e.to_string(),
    })?;

    Ok(VideoRecord {
        id: RecordId::generate(),
        name,
        size: format_file_size(bytes.len() as u64),
        mime_type: mime.to_string(),
        data: data_url::encode(mime, &bytes),
        upload_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Best-effort MIME guess for the diagnostic shown when a file is skipped.
fn guess_foreign_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "mkv" => "video/x-matroska",
        "txt" => "text/plain",
        _ => return Some(format!("application/{ext}")),
    };
    Some(mime.to_string())
}
