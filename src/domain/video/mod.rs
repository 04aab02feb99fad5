// SPDX-License-Identifier: MPL-2.0
//! Video record domain types.

pub mod data_url;
mod types;

pub use types::{
    format_file_size, format_upload_date, is_supported_mime, mime_for_path, RecordId, VideoRecord,
    SUPPORTED_EXTENSIONS, SUPPORTED_MIME_TYPES,
};
