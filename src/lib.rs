// SPDX-License-Identifier: MPL-2.0
//! `clipshelf` is a drag-and-drop video shelf built with the Iced GUI framework.
//!
//! Video files picked or dropped onto the window are base64-encoded and kept
//! in a single JSON storage slot; the gallery view renders one card per
//! stored record with in-place playback and confirmed deletion.

pub mod app;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod playback;
pub mod store;
pub mod ui;
