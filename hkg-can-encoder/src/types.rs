//! Core types for the HKG CAN encoder library
//!
//! This module defines the values that flow through the encoder: the logical
//! signal mapping of one message (`SignalFrame`), the packed output
//! (`CanFrame`) and the error type shared by every operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type for encoder operations
pub type Result<T> = std::result::Result<T, EncoderError>;

/// Packed CAN frame, ready for transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    /// CAN message ID (11-bit for every HKG message we emit)
    pub can_id: u32,
    /// Bus index, passed through unchanged from the caller
    pub bus: u8,
    /// Frame data bytes
    pub data: Vec<u8>,
}

impl CanFrame {
    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Display for CanFrame {
    /// candump-style `ID#DATA` rendering
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}#", self.can_id)?;
        for byte in &self.data {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Errors that can occur while building or packing frames
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("Failed to parse DBC file: {0}")]
    DbcParseError(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Signal '{signal}' is not part of message {message}")]
    SignalNotFound { message: String, signal: String },

    #[error("Signal '{signal}' of message {message} has no value")]
    MissingSignal { message: String, signal: String },

    #[error("Value {value} does not fit signal '{signal}' of message {message}")]
    ValueOutOfRange {
        message: String,
        signal: String,
        value: f64,
    },

    #[error("Previous {message} frame lacks carry-forward signal '{signal}'")]
    MissingCarryForward { message: String, signal: String },

    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Signal value types accepted by the packer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// Boolean value (0/1)
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating-point physical value (before scaling/offset)
    Float(f64),
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Integer(v) => write!(f, "{}", v),
            SignalValue::Float(v) => write!(f, "{:.3}", v),
            SignalValue::Boolean(v) => write!(f, "{}", if *v { "true" } else { "false" }),
        }
    }
}

impl SignalValue {
    /// Convert signal value to f64 for scaling
    pub fn as_f64(&self) -> f64 {
        match self {
            SignalValue::Integer(v) => *v as f64,
            SignalValue::Float(v) => *v,
            SignalValue::Boolean(v) => if *v { 1.0 } else { 0.0 },
        }
    }

    /// Convert signal value to i64, rounding floats to the nearest integer
    pub fn as_i64(&self) -> i64 {
        match self {
            SignalValue::Integer(v) => *v,
            SignalValue::Float(v) => v.round() as i64,
            SignalValue::Boolean(v) => i64::from(*v),
        }
    }

    /// The exact integer this value holds, if it holds one
    ///
    /// `None` for fractional or non-finite floats.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SignalValue::Integer(v) => Some(*v),
            SignalValue::Boolean(v) => Some(i64::from(*v)),
            SignalValue::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            SignalValue::Float(_) => None,
        }
    }

    /// Check if this is a non-zero value
    pub fn as_bool(&self) -> bool {
        match self {
            SignalValue::Boolean(v) => *v,
            SignalValue::Integer(v) => *v != 0,
            SignalValue::Float(v) => *v != 0.0,
        }
    }
}

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Boolean(v)
    }
}

impl From<i64> for SignalValue {
    fn from(v: i64) -> Self {
        SignalValue::Integer(v)
    }
}

impl From<i32> for SignalValue {
    fn from(v: i32) -> Self {
        SignalValue::Integer(i64::from(v))
    }
}

impl From<u8> for SignalValue {
    fn from(v: u8) -> Self {
        SignalValue::Integer(i64::from(v))
    }
}

impl From<u64> for SignalValue {
    fn from(v: u64) -> Self {
        SignalValue::Integer(v as i64)
    }
}

impl From<f64> for SignalValue {
    fn from(v: f64) -> Self {
        SignalValue::Float(v)
    }
}

/// Logical content of one message: signal name -> value
///
/// Keys are kept sorted so that logging and serialized output are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalFrame {
    values: BTreeMap<String, SignalValue>,
}

impl SignalFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a signal and return the frame
    pub fn with(mut self, name: &str, value: impl Into<SignalValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set (or replace) a signal value
    pub fn set(&mut self, name: &str, value: impl Into<SignalValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Look up a signal value
    pub fn get(&self, name: &str) -> Option<SignalValue> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (name, value) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Carry-forward merge: start from `base`, overwrite with `overlay`
    ///
    /// Neither input is modified; the result is a new frame.
    pub fn merge(base: &SignalFrame, overlay: &SignalFrame) -> SignalFrame {
        let mut values = base.values.clone();
        values.extend(overlay.values.iter().map(|(k, v)| (k.clone(), *v)));
        SignalFrame { values }
    }

    /// Fetch a signal a builder must carry forward from a previous frame
    pub(crate) fn require(&self, message: &str, signal: &str) -> Result<SignalValue> {
        self.get(signal).ok_or_else(|| EncoderError::MissingCarryForward {
            message: message.to_string(),
            signal: signal.to_string(),
        })
    }

    /// Fetch a carry-forward counter, rejecting values that are not whole numbers
    pub(crate) fn require_integer(&self, message: &str, signal: &str) -> Result<i64> {
        let value = self.require(message, signal)?;
        value.as_integer().ok_or_else(|| EncoderError::ValueOutOfRange {
            message: message.to_string(),
            signal: signal.to_string(),
            value: value.as_f64(),
        })
    }
}

impl<'a> FromIterator<(&'a str, SignalValue)> for SignalFrame {
    fn from_iter<T: IntoIterator<Item = (&'a str, SignalValue)>>(iter: T) -> Self {
        SignalFrame {
            values: iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}
