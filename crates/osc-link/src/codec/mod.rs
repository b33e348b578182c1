// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC message and bundle serialization.
//!
//! The transport layer treats the output as opaque bytes of known length.

mod bundle;
mod message;

pub use bundle::{Bundle, BundleElement, BUNDLE_TAG};
pub use message::Message;
