// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport constants and runtime configuration.
//!
//! - **Static**: wire constants (frame header size, default ceiling, URL schemes)
//! - **Dynamic**: [`TransportConfig`], built in code or read from the environment
//!
//! # Environment Variables
//!
//! `OSC_MAX_MSG_SIZE=<bytes>` - Maximum serialized payload size
//! `OSC_IPV6=0|1` - Accept IPv6 candidates during resolution
//! `OSC_SHARED_CLIENT_SOCKET=0|1` - Send plain UDP traffic through the shared client socket
//! `OSC_MULTICAST_TTL=<0-255>` - TTL given to newly created addresses

/// Default maximum size of a single serialized message or bundle.
pub const MAX_MSG_SIZE: usize = 32768;

/// Size of the TCP length prefix (u32 big-endian).
pub const TCP_FRAME_HEADER_SIZE: usize = 4;

/// Longest Unix-domain socket path accepted by the platform (excluding NUL).
#[cfg(target_os = "linux")]
pub const UNIX_PATH_MAX: usize = 107;

/// Longest Unix-domain socket path accepted by the platform (excluding NUL).
#[cfg(not(target_os = "linux"))]
pub const UNIX_PATH_MAX: usize = 103;

/// URL scheme prefix shared by all OSC transports.
pub const URL_SCHEME: &str = "osc";

/// Runtime configuration for a [`Transmitter`](crate::Transmitter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Payloads above this size are rejected before any I/O.
    pub max_message_size: usize,

    /// Accept IPv6 candidates (otherwise IPv4 only).
    pub ipv6: bool,

    /// Reuse the process-wide client socket for plain UDP sends,
    /// creating it on first use.
    pub shared_client_socket: bool,

    /// Multicast TTL applied to addresses created through
    /// [`Transmitter::address`](crate::Transmitter::address).
    pub default_ttl: Option<u8>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MSG_SIZE,
            ipv6: cfg!(feature = "ipv6"),
            shared_client_socket: true,
            default_ttl: None,
        }
    }
}

impl TransportConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum message size.
    #[must_use]
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Enable or disable IPv6 candidates.
    #[must_use]
    pub fn ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    /// Enable or disable the shared client socket.
    #[must_use]
    pub fn shared_client_socket(mut self, enabled: bool) -> Self {
        self.shared_client_socket = enabled;
        self
    }

    /// Set the TTL given to new addresses.
    #[must_use]
    pub fn default_ttl(mut self, ttl: Option<u8>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Create from environment variables, starting from the defaults.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(size) = lookup("OSC_MAX_MSG_SIZE").and_then(|v| v.parse::<usize>().ok()) {
            config.max_message_size = size;
        }
        if let Some(flag) = lookup("OSC_IPV6").and_then(|v| parse_flag(&v)) {
            config.ipv6 = flag;
        }
        if let Some(flag) = lookup("OSC_SHARED_CLIENT_SOCKET").and_then(|v| parse_flag(&v)) {
            config.shared_client_socket = flag;
        }
        if let Some(ttl) = lookup("OSC_MULTICAST_TTL").and_then(|v| v.parse::<u8>().ok()) {
            config.default_ttl = Some(ttl);
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.max_message_size, 32768);
        assert!(cfg.shared_client_socket);
        assert_eq!(cfg.default_ttl, None);
        assert_eq!(cfg.ipv6, cfg!(feature = "ipv6"));
    }

    #[test]
    fn test_builder_setters() {
        let cfg = TransportConfig::new()
            .max_message_size(1024)
            .ipv6(true)
            .shared_client_socket(false)
            .default_ttl(Some(4));
        assert_eq!(cfg.max_message_size, 1024);
        assert!(cfg.ipv6);
        assert!(!cfg.shared_client_socket);
        assert_eq!(cfg.default_ttl, Some(4));
    }

    #[test]
    fn test_from_env_values() {
        let cfg = TransportConfig::from_lookup(lookup(&[
            ("OSC_MAX_MSG_SIZE", "65000"),
            ("OSC_IPV6", "yes"),
            ("OSC_SHARED_CLIENT_SOCKET", "0"),
            ("OSC_MULTICAST_TTL", "16"),
        ]));
        assert_eq!(cfg.max_message_size, 65000);
        assert!(cfg.ipv6);
        assert!(!cfg.shared_client_socket);
        assert_eq!(cfg.default_ttl, Some(16));
    }

    #[test]
    fn test_from_env_ignores_garbage() {
        let cfg = TransportConfig::from_lookup(lookup(&[
            ("OSC_MAX_MSG_SIZE", "lots"),
            ("OSC_SHARED_CLIENT_SOCKET", "maybe"),
            ("OSC_MULTICAST_TTL", "300"),
        ]));
        assert_eq!(cfg, TransportConfig::default());
    }
}
