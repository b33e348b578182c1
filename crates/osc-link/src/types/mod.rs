// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable OSC value types: [`TimeTag`], [`OscType`] and [`OscArg`].

mod arg;
mod timetag;

pub use arg::{OscArg, OscType};
pub use timetag::{TimeTag, NTP_UNIX_OFFSET, TIMETAG_SIZE};
