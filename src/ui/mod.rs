// SPDX-License-Identifier: MPL-2.0
//! UI components and visual building blocks.

pub mod confirm;
pub mod design_tokens;
pub mod gallery;
pub mod icons;
pub mod notifications;
pub mod styles;
pub mod theming;
