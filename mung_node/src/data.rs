// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed extension values carried in a node's `data` bag.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Extension fields keyed by name, such as `pitch_step` or `midi_pitch_code`.
///
/// Iteration (and therefore encoding) follows key order.
pub type DataMap = BTreeMap<String, DataValue>;

/// A typed value stored in a node's `data` bag.
///
/// Each variant keeps its native type through a decode/encode cycle, so a
/// list of link ids stays a list of integers rather than a string.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    /// A signed integer, e.g. a MIDI pitch code.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// Free text, e.g. a pitch step name.
    Str(String),
    /// An ordered sequence of integers, e.g. precedence links.
    IntList(Vec<i64>),
    /// An ordered sequence of floats.
    FloatList(Vec<f64>),
    /// An ordered sequence of strings.
    StrList(Vec<String>),
}

impl DataValue {
    /// The type tag this value carries in the record format.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::IntList(_) => "list[int]",
            Self::FloatList(_) => "list[float]",
            Self::StrList(_) => "list[str]",
        }
    }

    /// The integer, if this is a [`DataValue::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The float, if this is a [`DataValue::Float`].
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The text, if this is a [`DataValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// The integers, if this is a [`DataValue::IntList`].
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntList(v) => Some(v),
            _ => None,
        }
    }

    /// The floats, if this is a [`DataValue::FloatList`].
    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }

    /// The strings, if this is a [`DataValue::StrList`].
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<i64>> for DataValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

impl From<Vec<f64>> for DataValue {
    fn from(v: Vec<f64>) -> Self {
        Self::FloatList(v)
    }
}

impl From<Vec<String>> for DataValue {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}
