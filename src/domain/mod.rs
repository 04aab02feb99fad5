// SPDX-License-Identifier: MPL-2.0
//! Domain layer: pure types and conversions with no I/O.

pub mod video;
