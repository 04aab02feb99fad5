// SPDX-License-Identifier: MPL-2.0
//! Centralized icon module.
//!
//! Icons are monochrome SVGs embedded at compile time via `include_bytes!`;
//! handles are cached with `OnceLock` so each asset is parsed once. Colors
//! are applied at render time through [`tinted`] so the same asset works in
//! both themes.
//!
//! # Naming Convention
//!
//! Icons use generic visual names describing the icon's appearance,
//! not the action context (e.g., `trash` not `delete_record`).

use iced::widget::svg::{self, Handle, Svg};
use iced::{Color, Length, Theme};
use std::sync::OnceLock;

/// Defines an icon function with a cached handle. The handle is created once
/// on first access and reused thereafter.
macro_rules! define_icon {
    ($name:ident, $filename:literal, $doc:literal) => {
        #[doc = $doc]
        pub fn $name() -> Svg<'static> {
            static HANDLE: OnceLock<Handle> = OnceLock::new();
            static DATA: &[u8] = include_bytes!(concat!("../../assets/icons/", $filename));
            let handle = HANDLE.get_or_init(|| Handle::from_memory(DATA));
            Svg::new(handle.clone())
        }
    };
}

// =============================================================================
// Playback Icons
// =============================================================================

define_icon!(play, "play.svg", "Play icon: triangle pointing right.");
define_icon!(pause, "pause.svg", "Pause icon: two vertical bars.");
define_icon!(stop, "stop.svg", "Stop icon: solid square.");
define_icon!(
    film,
    "film.svg",
    "Film icon: strip with sprocket holes, used as the card placeholder."
);

// =============================================================================
// Status & Feedback Icons
// =============================================================================

define_icon!(
    warning,
    "warning.svg",
    "Warning icon: triangle with exclamation mark."
);
define_icon!(
    checkmark,
    "checkmark.svg",
    "Checkmark icon: check/tick mark for success."
);
define_icon!(info, "info.svg", "Info icon: letter 'i' in circle.");
define_icon!(cross, "cross.svg", "Cross icon: X mark shape.");

// =============================================================================
// Action Icons
// =============================================================================

define_icon!(
    trash,
    "trash.svg",
    "Trash icon: garbage bin (used for delete)."
);
define_icon!(
    folder_open,
    "folder_open.svg",
    "Folder icon: open folder (used for browse/add)."
);

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates an icon with specified dimensions.
pub fn sized(icon: Svg<'static>, size: f32) -> Svg<'static> {
    icon.width(Length::Fixed(size)).height(Length::Fixed(size))
}

/// Paints an icon with the theme's text color.
pub fn tinted(icon: Svg<'static>) -> Svg<'static> {
    icon.style(|theme: &Theme, _status| svg::Style {
        color: Some(theme.palette().text),
    })
}

/// Paints an icon with a fixed color, ignoring the theme.
pub fn colored(icon: Svg<'static>, color: Color) -> Svg<'static> {
    icon.style(move |_theme: &Theme, _status| svg::Style { color: Some(color) })
}
