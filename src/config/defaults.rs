// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration settings.

use crate::ui::theming::ThemeMode;

/// Default slot capacity ceiling in MiB, mirroring the single-digit-megabyte
/// budget of browser key-value storage.
pub const DEFAULT_MAX_SLOT_MIB: u32 = 10;

pub(super) fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

pub(super) fn default_max_slot_mib() -> Option<u32> {
    Some(DEFAULT_MAX_SLOT_MIB)
}
