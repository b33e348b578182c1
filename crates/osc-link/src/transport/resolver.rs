// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host/port resolution for UDP and TCP addresses.
//!
//! Unix-domain addresses never reach the resolver; their path is used as is.

use std::fmt;
use std::net::SocketAddr;
#[cfg(any(test, feature = "test-util"))]
use std::sync::atomic::{AtomicUsize, Ordering};

use super::protocol::Protocol;
#[cfg(any(test, feature = "test-util"))]
use crate::error::codes;
use crate::error::{Error, Result};

/// Turns a host/port pair into candidate endpoints.
pub trait Resolve: Send + Sync + fmt::Debug {
    /// Resolve `host`:`port` for `protocol`.
    ///
    /// Returns at least one candidate on success.
    fn resolve(&self, host: &str, port: &str, protocol: Protocol) -> Result<Vec<SocketAddr>>;
}

/// Resolver backed by the operating system (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver {
    ipv6: bool,
}

impl SystemResolver {
    /// Create a resolver. With `ipv6 = false` only IPv4 candidates are kept.
    #[must_use]
    pub fn new(ipv6: bool) -> Self {
        Self { ipv6 }
    }
}

impl Resolve for SystemResolver {
    fn resolve(&self, host: &str, port: &str, protocol: Protocol) -> Result<Vec<SocketAddr>> {
        let lookup_host = if host.is_empty() { "localhost" } else { host };
        let candidates = lookup(lookup_host, port, protocol, self.ipv6)?;

        if candidates.is_empty() {
            log::debug!(
                "[OSC-RESOLVE] {}://{}:{} yielded no usable candidate (ipv6={})",
                protocol,
                lookup_host,
                port,
                self.ipv6
            );
            return Err(Error::NoCandidates {
                host: host.to_string(),
                port: port.to_string(),
            });
        }

        Ok(candidates)
    }
}

/// `getaddrinfo` lookup. Failures carry the `EAI_*` code and `gai_strerror` text.
#[cfg(unix)]
fn lookup(host: &str, port: &str, protocol: Protocol, ipv6: bool) -> Result<Vec<SocketAddr>> {
    use std::ffi::{CStr, CString};
    use std::ptr;

    let nul_error = |what: &str| Error::Resolve {
        code: libc::EAI_NONAME,
        message: format!("{} contains a NUL byte", what),
    };
    let c_host = CString::new(host).map_err(|_| nul_error("host"))?;
    let c_port = if port.is_empty() {
        None
    } else {
        Some(CString::new(port).map_err(|_| nul_error("port"))?)
    };

    // SAFETY: addrinfo is a plain C struct; all-zero is a valid "no hints" value.
    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = if ipv6 { libc::AF_UNSPEC } else { libc::AF_INET };
    hints.ai_socktype = match protocol {
        Protocol::Udp => libc::SOCK_DGRAM,
        Protocol::Tcp => libc::SOCK_STREAM,
        Protocol::Unix => 0,
    };

    let mut list: *mut libc::addrinfo = ptr::null_mut();
    // SAFETY: the C strings and hints outlive the call; `list` is only read on success.
    let rc = unsafe {
        libc::getaddrinfo(
            c_host.as_ptr(),
            c_port.as_ref().map_or(ptr::null(), |p| p.as_ptr()),
            &hints,
            &mut list,
        )
    };
    if rc != 0 {
        // SAFETY: gai_strerror returns a static NUL-terminated string.
        let message = unsafe { CStr::from_ptr(libc::gai_strerror(rc)) }
            .to_string_lossy()
            .into_owned();
        return Err(Error::Resolve { code: rc, message });
    }

    let mut candidates = Vec::new();
    let mut cursor = list;
    while !cursor.is_null() {
        // SAFETY: `cursor` walks the list returned by getaddrinfo, freed below.
        let info = unsafe { &*cursor };
        // SAFETY: ai_addr points to ai_addrlen bytes of the family's sockaddr.
        if let Some(addr) = unsafe { socket_addr(info) } {
            if !candidates.contains(&addr) {
                candidates.push(addr);
            }
        }
        cursor = info.ai_next;
    }
    // SAFETY: `list` came from a successful getaddrinfo and is freed once.
    unsafe { libc::freeaddrinfo(list) };

    Ok(candidates)
}

#[cfg(unix)]
unsafe fn socket_addr(info: &libc::addrinfo) -> Option<SocketAddr> {
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

    if info.ai_addr.is_null() {
        return None;
    }
    let len = info.ai_addrlen as usize;
    match info.ai_family {
        libc::AF_INET if len >= std::mem::size_of::<libc::sockaddr_in>() => {
            let sin = &*(info.ai_addr as *const libc::sockaddr_in);
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
            Some(SocketAddr::V4(SocketAddrV4::new(ip, u16::from_be(sin.sin_port))))
        }
        libc::AF_INET6 if len >= std::mem::size_of::<libc::sockaddr_in6>() => {
            let sin6 = &*(info.ai_addr as *const libc::sockaddr_in6);
            Some(SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sin6.sin6_addr.s6_addr),
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        _ => None,
    }
}

/// Fallback through std where `getaddrinfo` is not exposed by libc.
#[cfg(not(unix))]
fn lookup(host: &str, port: &str, _protocol: Protocol, ipv6: bool) -> Result<Vec<SocketAddr>> {
    use std::net::ToSocketAddrs;

    let port_num: u16 = port.parse().map_err(|_| Error::Resolve {
        code: crate::error::codes::RESOLVE,
        message: format!("unknown service '{}'", port),
    })?;
    let candidates = (host, port_num)
        .to_socket_addrs()
        .map_err(|e| Error::Resolve {
            code: e.raw_os_error().unwrap_or(crate::error::codes::RESOLVE),
            message: e.to_string(),
        })?
        .filter(|addr| ipv6 || addr.is_ipv4())
        .collect();
    Ok(candidates)
}

/// Resolver returning a fixed answer, for tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct StaticResolver {
    answer: Vec<SocketAddr>,
    failures: AtomicUsize,
    calls: AtomicUsize,
}

#[cfg(any(test, feature = "test-util"))]
impl StaticResolver {
    /// Always answer with `answer`.
    #[must_use]
    pub fn new(answer: Vec<SocketAddr>) -> Self {
        Self {
            answer,
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the first `count` lookups before answering.
    #[must_use]
    pub fn failing_first(self, count: usize) -> Self {
        self.failures.store(count, Ordering::SeqCst);
        self
    }

    /// Number of lookups performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Resolve for StaticResolver {
    fn resolve(&self, host: &str, port: &str, _protocol: Protocol) -> Result<Vec<SocketAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.failures.store(pending - 1, Ordering::SeqCst);
            return Err(Error::Resolve {
                code: codes::RESOLVE,
                message: format!("injected lookup failure for {}", host),
            });
        }
        if self.answer.is_empty() {
            return Err(Error::NoCandidates {
                host: host.to_string(),
                port: port.to_string(),
            });
        }
        Ok(self.answer.clone())
    }
}
