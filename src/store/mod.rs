// SPDX-License-Identifier: MPL-2.0
//! The persistence slot for video records.
//!
//! All records live in a single UTF-8 JSON array stored in one file keyed by
//! [`STORAGE_KEY`] inside the application data directory. The [`VideoStore`]
//! owns the collection in memory and rewrites the whole slot on every
//! mutation; the UI derives its view from the store rather than touching
//! storage directly, which keeps the persisted sequence and the rendered
//! gallery in 1:1 correspondence.
//!
//! A missing or unparsable slot is treated as an empty collection (the
//! unparsable case additionally yields a warning key for the toast layer).
//! Every write is checked against an explicit capacity ceiling; exceeding it
//! rejects the mutation with [`StoreError::CapacityExceeded`] and leaves both
//! the slot and the in-memory collection untouched.
//!
//! # Path Resolution
//!
//! The slot location follows [`paths::get_app_data_dir`]; pass a base
//! directory to `load_from()` to isolate tests.

use crate::app::paths;
use crate::domain::video::{RecordId, VideoRecord};
use crate::error::{Result, StoreError};
use std::fs;
use std::path::PathBuf;

/// Fixed key naming the single storage slot.
pub const STORAGE_KEY: &str = "uploadedVideos";

/// Slot file name within the app data directory.
const SLOT_FILE: &str = "uploadedVideos.json";

/// Default slot ceiling, mirroring the single-digit-megabyte budget of
/// browser key-value storage.
pub const DEFAULT_MAX_SLOT_BYTES: usize = 10 * 1024 * 1024;

/// Service object owning the ordered record collection and its slot file.
#[derive(Debug)]
pub struct VideoStore {
    records: Vec<VideoRecord>,
    base_dir: Option<PathBuf>,
    max_slot_bytes: usize,
}

impl VideoStore {
    /// Loads the store from the default slot location.
    ///
    /// Returns the store plus an optional warning key when the slot existed
    /// but could not be parsed (the collection then starts empty).
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads the store from a custom base directory (tests, portable runs).
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let mut store = Self {
            records: Vec::new(),
            base_dir,
            max_slot_bytes: DEFAULT_MAX_SLOT_BYTES,
        };

        let Some(path) = store.slot_path() else {
            return (store, None);
        };

        if !path.exists() {
            return (store, None);
        }

        match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => (store, None),
            Ok(contents) => match serde_json::from_str::<Vec<VideoRecord>>(&contents) {
                Ok(records) => {
                    store.records = records;
                    (store, None)
                }
                Err(_) => (store, Some("notification-library-parse-error".to_string())),
            },
            Err(_) => (store, Some("notification-library-read-error".to_string())),
        }
    }

    /// Overrides the slot capacity ceiling (from `[storage] max-slot-mib`).
    pub fn set_max_slot_bytes(&mut self, bytes: usize) {
        self.max_slot_bytes = bytes;
    }

    #[must_use]
    pub fn max_slot_bytes(&self) -> usize {
        self.max_slot_bytes
    }

    /// The persisted ordered sequence, oldest-appended first.
    #[must_use]
    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&VideoRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Appends a record and rewrites the slot.
    ///
    /// On any error the collection is unchanged: capacity is checked against
    /// the serialized form before anything is written.
    pub fn append(&mut self, record: VideoRecord) -> Result<()> {
        let mut next = self.records.clone();
        next.push(record);
        self.write_slot(&next)?;
        self.records = next;
        Ok(())
    }

    /// Removes the record with the given id, if present, and rewrites the
    /// slot. Returns whether a record was removed; every other record keeps
    /// its relative order.
    pub fn remove(&mut self, id: &RecordId) -> Result<bool> {
        if !self.records.iter().any(|record| &record.id == id) {
            return Ok(false);
        }

        let next: Vec<VideoRecord> = self
            .records
            .iter()
            .filter(|record| &record.id != id)
            .cloned()
            .collect();
        self.write_slot(&next)?;
        self.records = next;
        Ok(true)
    }

    /// Serializes the full collection and overwrites the slot file.
    ///
    /// Writes go through a sibling temp file plus rename so a crash mid-write
    /// cannot garble the slot.
    fn write_slot(&self, records: &[VideoRecord]) -> Result<()> {
        let payload = serde_json::to_string(records)?;
        if payload.len() > self.max_slot_bytes {
            return Err(StoreError::CapacityExceeded {
                needed: payload.len(),
                limit: self.max_slot_bytes,
            }
            .into());
        }

        let path = self.slot_path().ok_or(StoreError::UnresolvedPath)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(|e| StoreError::Write(e.to_string()))?;
        fs::rename(&staging, &path).map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }

    /// Full path of the slot file, honoring the base directory override.
    fn slot_path(&self) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(self.base_dir.clone()).map(|mut path| {
            path.push(SLOT_FILE);
            path
        })
    }
}
