// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Json(String),
    DataUrl(String),
    Config(String),
    Capture(CaptureError),
    Store(StoreError),
}

/// Reasons a candidate file never becomes a record.
///
/// Both variants are absorbed locally by the capture pipeline: the file is
/// skipped, a diagnostic is logged, and capture continues for the rest.
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The file's media type is not in the supported set.
    UnsupportedType {
        name: String,
        mime: Option<String>,
    },

    /// Reading the file's content failed (vanished, permissions, I/O).
    Read { name: String, message: String },
}

impl CaptureError {
    /// Original filename of the rejected candidate.
    pub fn file_name(&self) -> &str {
        match self {
            CaptureError::UnsupportedType { name, .. } | CaptureError::Read { name, .. } => name,
        }
    }
}

/// Failures of the persistence slot.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The serialized collection would exceed the configured slot ceiling.
    CapacityExceeded { needed: usize, limit: usize },

    /// The slot location could not be resolved.
    UnresolvedPath,

    /// Writing the slot file failed.
    Write(String),
}

impl StoreError {
    /// Returns the i18n message key used when surfacing this error as a toast.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StoreError::CapacityExceeded { .. } => "notification-capacity-exceeded",
            StoreError::UnresolvedPath | StoreError::Write(_) => "notification-store-write-error",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::UnsupportedType { name, mime } => match mime {
                Some(mime) => write!(f, "{name}: unsupported media type {mime}"),
                None => write!(f, "{name}: unrecognized media type"),
            },
            CaptureError::Read { name, message } => write!(f, "{name}: read failed: {message}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::CapacityExceeded { needed, limit } => {
                write!(f, "slot capacity exceeded: {needed} bytes > {limit} bytes")
            }
            StoreError::UnresolvedPath => write!(f, "storage slot path could not be resolved"),
            StoreError::Write(message) => write!(f, "slot write failed: {message}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {e}"),
            Error::Json(e) => write!(f, "JSON Error: {e}"),
            Error::DataUrl(e) => write!(f, "Data URL Error: {e}"),
            Error::Config(e) => write!(f, "Config Error: {e}"),
            Error::Capture(e) => write!(f, "Capture Error: {e}"),
            Error::Store(e) => write!(f, "Store Error: {e}"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(err: CaptureError) -> Self {
        Error::Capture(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn from_json_error_produces_json_variant() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_error.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn unsupported_type_display_includes_mime() {
        let err = CaptureError::UnsupportedType {
            name: "slides.pdf".into(),
            mime: Some("application/pdf".into()),
        };
        let rendered = format!("{}", err);
        assert!(rendered.contains("slides.pdf"));
        assert!(rendered.contains("application/pdf"));
    }

    #[test]
    fn read_error_keeps_file_name() {
        let err = CaptureError::Read {
            name: "clip.mp4".into(),
            message: "permission denied".into(),
        };
        assert_eq!(err.file_name(), "clip.mp4");
    }

    #[test]
    fn capacity_exceeded_maps_to_capacity_key() {
        let err = StoreError::CapacityExceeded {
            needed: 11,
            limit: 10,
        };
        assert_eq!(err.i18n_key(), "notification-capacity-exceeded");
    }

    #[test]
    fn write_error_maps_to_write_key() {
        let err = StoreError::Write("boom".into());
        assert_eq!(err.i18n_key(), "notification-store-write-error");
    }
}
