// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Transport used to reach an [`Address`](crate::Address).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Connectionless UDP; destination supplied per datagram.
    Udp,
    /// TCP with 4-byte length-prefix framing.
    Tcp,
    /// Unix-domain datagram socket addressed by filesystem path.
    Unix,
}

impl Protocol {
    /// Raw tag for UDP.
    pub const RAW_UDP: i32 = 0x1;
    /// Raw tag for Unix-domain.
    pub const RAW_UNIX: i32 = 0x2;
    /// Raw tag for TCP.
    pub const RAW_TCP: i32 = 0x4;

    /// Decode a raw protocol tag.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedProtocol`] for any other value.
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            Self::RAW_UDP => Ok(Protocol::Udp),
            Self::RAW_UNIX => Ok(Protocol::Unix),
            Self::RAW_TCP => Ok(Protocol::Tcp),
            other => Err(Error::UnsupportedProtocol(format!("tag {}", other))),
        }
    }

    /// Raw protocol tag.
    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Protocol::Udp => Self::RAW_UDP,
            Protocol::Unix => Self::RAW_UNIX,
            Protocol::Tcp => Self::RAW_TCP,
        }
    }

    /// Name used in URLs (`osc.<name>://`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
            Protocol::Unix => "unix",
        }
    }

    /// UDP and TCP need host/port resolution; Unix-domain paths are used verbatim.
    #[must_use]
    pub fn needs_resolution(self) -> bool {
        matches!(self, Protocol::Udp | Protocol::Tcp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            "unix" => Ok(Protocol::Unix),
            other => Err(Error::UnsupportedProtocol(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Protocol {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<i32> for Protocol {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        Self::from_raw(raw)
    }
}
