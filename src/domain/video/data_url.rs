// SPDX-License-Identifier: MPL-2.0
//! Base64 data URL encoding for record payloads.
//!
//! The slot format embeds each file's content as `data:<mime>;base64,<payload>`
//! so a record is self-contained and directly usable as a playback source.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Encodes raw file content into a data URL with the given MIME type.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Decodes a data URL back into its MIME type and raw content.
pub fn decode(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::DataUrl("missing data: scheme".to_string()))?;

    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::DataUrl("missing base64 marker".to_string()))?;

    if mime.is_empty() {
        return Err(Error::DataUrl("empty media type".to_string()));
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| Error::DataUrl(format!("invalid base64 payload: {e}")))?;

    Ok((mime.to_string(), bytes))
}
