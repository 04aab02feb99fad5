// SPDX-License-Identifier: MPL-2.0
//! Localization of user-facing strings with Fluent.

pub mod fluent;
