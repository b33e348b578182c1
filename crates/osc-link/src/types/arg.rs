// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OSC argument type tags and tagged argument values.

use std::fmt;

use super::TimeTag;

/// OSC type tags. The discriminant is the type character used on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OscType {
    /// 32 bit signed integer.
    Int32 = b'i',
    /// 32 bit IEEE-754 float.
    Float = b'f',
    /// NUL-terminated string.
    String = b's',
    /// Binary blob.
    Blob = b'b',
    /// 64 bit signed integer.
    Int64 = b'h',
    /// OSC TimeTag.
    TimeTag = b't',
    /// 64 bit IEEE-754 double.
    Double = b'd',
    /// String used by systems that distinguish symbols.
    Symbol = b'S',
    /// 8 bit character, sent in 4 bytes.
    Char = b'c',
    /// 4 byte MIDI packet.
    Midi = b'm',
    /// True, no payload.
    True = b'T',
    /// False, no payload.
    False = b'F',
    /// Nil, no payload.
    Nil = b'N',
    /// Infinitum, no payload.
    Infinitum = b'I',
}

impl OscType {
    /// Parse a type character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let ty = match c {
            'i' => OscType::Int32,
            'f' => OscType::Float,
            's' => OscType::String,
            'b' => OscType::Blob,
            'h' => OscType::Int64,
            't' => OscType::TimeTag,
            'd' => OscType::Double,
            'S' => OscType::Symbol,
            'c' => OscType::Char,
            'm' => OscType::Midi,
            'T' => OscType::True,
            'F' => OscType::False,
            'N' => OscType::Nil,
            'I' => OscType::Infinitum,
            _ => return None,
        };
        Some(ty)
    }

    /// The type character.
    #[must_use]
    pub fn as_char(self) -> char {
        self as u8 as char
    }

    /// Integer and floating point types.
    #[must_use]
    pub fn is_numerical(self) -> bool {
        matches!(
            self,
            OscType::Int32 | OscType::Float | OscType::Int64 | OscType::Double
        )
    }

    /// String and symbol types.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(self, OscType::String | OscType::Symbol)
    }

    /// Marker types that carry no payload bytes.
    #[must_use]
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            OscType::True | OscType::False | OscType::Nil | OscType::Infinitum
        )
    }
}

impl fmt::Display for OscType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single OSC argument with its concrete payload.
#[derive(Clone, Debug, PartialEq)]
pub enum OscArg {
    /// 32 bit signed integer.
    Int32(i32),
    /// 32 bit IEEE-754 float.
    Float(f32),
    /// String, NUL-terminated on the wire.
    String(String),
    /// Binary blob.
    Blob(Vec<u8>),
    /// 64 bit signed integer.
    Int64(i64),
    /// OSC TimeTag.
    TimeTag(TimeTag),
    /// 64 bit IEEE-754 double.
    Double(f64),
    /// Symbol, encoded like a string.
    Symbol(String),
    /// 8 bit character.
    Char(u8),
    /// 4 byte MIDI packet.
    Midi([u8; 4]),
    /// True.
    True,
    /// False.
    False,
    /// Nil.
    Nil,
    /// Infinitum.
    Infinitum,
}

impl OscArg {
    /// Type tag for this value.
    #[must_use]
    pub fn type_tag(&self) -> OscType {
        match self {
            OscArg::Int32(_) => OscType::Int32,
            OscArg::Float(_) => OscType::Float,
            OscArg::String(_) => OscType::String,
            OscArg::Blob(_) => OscType::Blob,
            OscArg::Int64(_) => OscType::Int64,
            OscArg::TimeTag(_) => OscType::TimeTag,
            OscArg::Double(_) => OscType::Double,
            OscArg::Symbol(_) => OscType::Symbol,
            OscArg::Char(_) => OscType::Char,
            OscArg::Midi(_) => OscType::Midi,
            OscArg::True => OscType::True,
            OscArg::False => OscType::False,
            OscArg::Nil => OscType::Nil,
            OscArg::Infinitum => OscType::Infinitum,
        }
    }

    /// Marker argument for a payload-less tag.
    #[must_use]
    pub fn marker(ty: OscType) -> Option<Self> {
        match ty {
            OscType::True => Some(OscArg::True),
            OscType::False => Some(OscArg::False),
            OscType::Nil => Some(OscArg::Nil),
            OscType::Infinitum => Some(OscArg::Infinitum),
            _ => None,
        }
    }
}

impl From<i32> for OscArg {
    fn from(v: i32) -> Self {
        OscArg::Int32(v)
    }
}

impl From<i64> for OscArg {
    fn from(v: i64) -> Self {
        OscArg::Int64(v)
    }
}

impl From<f32> for OscArg {
    fn from(v: f32) -> Self {
        OscArg::Float(v)
    }
}

impl From<f64> for OscArg {
    fn from(v: f64) -> Self {
        OscArg::Double(v)
    }
}

impl From<&str> for OscArg {
    fn from(v: &str) -> Self {
        OscArg::String(v.to_string())
    }
}

impl From<String> for OscArg {
    fn from(v: String) -> Self {
        OscArg::String(v)
    }
}

impl From<bool> for OscArg {
    fn from(v: bool) -> Self {
        if v {
            OscArg::True
        } else {
            OscArg::False
        }
    }
}

impl From<TimeTag> for OscArg {
    fn from(v: TimeTag) -> Self {
        OscArg::TimeTag(v)
    }
}

impl From<Vec<u8>> for OscArg {
    fn from(v: Vec<u8>) -> Self {
        OscArg::Blob(v)
    }
}
