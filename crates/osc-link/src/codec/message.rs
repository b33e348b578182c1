// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC message builder and serializer.
//!
//! # Wire Format
//!
//! ```text
//! +-------------------+----------------------+-------------------+
//! | path (padded)     | ",<tags>" (padded)   | argument data     |
//! +-------------------+----------------------+-------------------+
//! ```
//!
//! Strings are NUL-terminated and padded to a multiple of 4 bytes; all
//! numbers are big-endian.

use crate::error::{Error, Result};
use crate::types::{OscArg, OscType};

/// Size of a string on the wire: content, NUL, padding to 4.
pub(crate) fn padded_str_len(s: &str) -> usize {
    (s.len() + 4) & !3
}

/// Size of a blob on the wire: 4-byte length, content, padding to 4.
fn padded_blob_len(data: &[u8]) -> usize {
    4 + ((data.len() + 3) & !3)
}

pub(crate) fn write_str(out: &mut Vec<u8>, s: &str) {
    let start = out.len();
    out.extend_from_slice(s.as_bytes());
    out.resize(start + padded_str_len(s), 0);
}

/// An OSC message: an ordered list of tagged arguments.
///
/// The path is supplied at serialization time so the same message can be
/// sent to several paths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    args: Vec<OscArg>,
}

impl Message {
    /// Create an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message from already-tagged arguments.
    #[must_use]
    pub fn with_args(args: Vec<OscArg>) -> Self {
        Self { args }
    }

    /// Append one argument.
    pub fn add(&mut self, arg: impl Into<OscArg>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments described by a type-tag string.
    ///
    /// `T`, `F`, `N` and `I` consume no argument. Every other tag consumes
    /// the next argument, whose type must match exactly. A leading `,` is
    /// accepted. On failure the message is left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownType`] for a character that is not a type tag,
    /// [`Error::BadFormat`] for a missing, mismatched or surplus argument.
    pub fn add_typed<I>(&mut self, types: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = OscArg>,
    {
        let mut args = args.into_iter();
        let mut staged = Vec::with_capacity(types.len());

        for c in types.strip_prefix(',').unwrap_or(types).chars() {
            let ty = OscType::from_char(c).ok_or(Error::UnknownType(c))?;
            if let Some(marker) = OscArg::marker(ty) {
                staged.push(marker);
                continue;
            }
            let arg = args
                .next()
                .ok_or_else(|| Error::BadFormat(format!("missing argument for '{}'", c)))?;
            if arg.type_tag() != ty {
                return Err(Error::BadFormat(format!(
                    "expected '{}' argument, got '{}'",
                    c,
                    arg.type_tag()
                )));
            }
            staged.push(arg);
        }

        if args.next().is_some() {
            return Err(Error::BadFormat("more arguments than type tags".to_string()));
        }

        self.args.extend(staged);
        Ok(())
    }

    /// Arguments in order.
    #[must_use]
    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    /// Type-tag string without the leading comma.
    #[must_use]
    pub fn types(&self) -> String {
        self.args.iter().map(|a| a.type_tag().as_char()).collect()
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when the message has no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Serialized length for `path`.
    #[must_use]
    pub fn length(&self, path: &str) -> usize {
        // ',' + one char per argument, then NUL and padding
        let tags = (1 + self.args.len() + 4) & !3;
        padded_str_len(path) + tags + self.args.iter().map(arg_len).sum::<usize>()
    }

    /// Serialize with `path` into a new buffer of exactly [`length`](Self::length) bytes.
    #[must_use]
    pub fn serialize(&self, path: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length(path));
        write_str(&mut out, path);

        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        tags.push_str(&self.types());
        write_str(&mut out, &tags);

        for arg in &self.args {
            write_arg(&mut out, arg);
        }
        out
    }
}

fn arg_len(arg: &OscArg) -> usize {
    match arg {
        OscArg::Int32(_) | OscArg::Float(_) | OscArg::Char(_) | OscArg::Midi(_) => 4,
        OscArg::Int64(_) | OscArg::Double(_) | OscArg::TimeTag(_) => 8,
        OscArg::String(s) | OscArg::Symbol(s) => padded_str_len(s),
        OscArg::Blob(b) => padded_blob_len(b),
        OscArg::True | OscArg::False | OscArg::Nil | OscArg::Infinitum => 0,
    }
}

fn write_arg(out: &mut Vec<u8>, arg: &OscArg) {
    match arg {
        OscArg::Int32(v) => out.extend_from_slice(&v.to_be_bytes()),
        OscArg::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
        OscArg::Int64(v) => out.extend_from_slice(&v.to_be_bytes()),
        OscArg::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
        OscArg::TimeTag(t) => out.extend_from_slice(&t.to_bytes()),
        OscArg::String(s) | OscArg::Symbol(s) => write_str(out, s),
        OscArg::Char(c) => out.extend_from_slice(&u32::from(*c).to_be_bytes()),
        OscArg::Midi(m) => out.extend_from_slice(m),
        OscArg::Blob(b) => {
            let start = out.len();
            out.extend_from_slice(&(b.len() as u32).to_be_bytes());
            out.extend_from_slice(b);
            out.resize(start + padded_blob_len(b), 0);
        }
        OscArg::True | OscArg::False | OscArg::Nil | OscArg::Infinitum => {}
    }
}
