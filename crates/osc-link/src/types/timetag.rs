// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC TimeTag: 64-bit NTP-style fixed-point timestamp.
//!
//! ```text
//! +----------------------+----------------------+
//! | seconds (u32 BE)     | fraction (u32 BE)    |
//! +----------------------+----------------------+
//! ```
//!
//! Seconds count from 1900-01-01 00:00 UTC, the fraction is in units of
//! 1/2^32 s. The value `{0, 1}` is reserved and means "immediately".

use std::fmt;
use std::ops::Add;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Encoded size of a TimeTag on the wire.
pub const TIMETAG_SIZE: usize = 8;

const FRACTION_SCALE: f64 = 4_294_967_296.0; // 2^32

/// OSC TimeTag value.
///
/// Ordering and equality compare the raw fields, never a derived float.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeTag {
    /// Seconds since 1900-01-01 UTC.
    pub seconds: u32,
    /// Fractional seconds in units of 1/2^32 s.
    pub fraction: u32,
}

impl TimeTag {
    /// Reserved value meaning "deliver immediately, do not bundle".
    pub const IMMEDIATE: TimeTag = TimeTag {
        seconds: 0,
        fraction: 1,
    };

    /// Create a TimeTag from raw fields.
    #[must_use]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// True only for the exact `{0, 1}` sentinel.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        self.seconds == Self::IMMEDIATE.seconds && self.fraction == Self::IMMEDIATE.fraction
    }

    /// Current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert a `SystemTime`. Times before 1970 clamp to the Unix epoch;
    /// seconds wrap at the 2036 NTP era boundary like every 32-bit OSC clock.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let seconds = (since_unix.as_secs() + NTP_UNIX_OFFSET) as u32;
        let fraction = ((u64::from(since_unix.subsec_nanos()) << 32) / 1_000_000_000) as u32;
        Self { seconds, fraction }
    }

    /// Difference `a - b` in seconds.
    #[must_use]
    pub fn diff(a: TimeTag, b: TimeTag) -> f64 {
        let secs = i64::from(a.seconds) - i64::from(b.seconds);
        let frac = i64::from(a.fraction) - i64::from(b.fraction);
        secs as f64 + frac as f64 / FRACTION_SCALE
    }

    /// Encode as 8 big-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; TIMETAG_SIZE] {
        let mut out = [0u8; TIMETAG_SIZE];
        out[..4].copy_from_slice(&self.seconds.to_be_bytes());
        out[4..].copy_from_slice(&self.fraction.to_be_bytes());
        out
    }

    /// Decode from 8 big-endian bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; TIMETAG_SIZE]) -> Self {
        Self {
            seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// Time `duration` after the tag; the fraction carries into seconds.
impl Add<Duration> for TimeTag {
    type Output = TimeTag;

    fn add(self, duration: Duration) -> TimeTag {
        let frac_total = u64::from(self.fraction)
            + ((u64::from(duration.subsec_nanos()) << 32) / 1_000_000_000);
        let carry = frac_total >> 32;
        let seconds = u64::from(self.seconds) + duration.as_secs() + carry;
        TimeTag {
            seconds: seconds as u32,
            fraction: frac_total as u32,
        }
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_immediate() {
            write!(f, "immediate")
        } else {
            write!(f, "{:08x}.{:08x}", self.seconds, self.fraction)
        }
    }
}
