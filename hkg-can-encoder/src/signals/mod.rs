//! Signal database and DBC parser
//!
//! This module contains the DBC parser and the signal database the packer
//! reads message layouts from.

pub mod dbc;
pub mod database;

// Re-export key types for convenience
pub use database::{
    ByteOrder, DatabaseStats, MessageDefinition, SignalDatabase, SignalDefinition, ValueType,
};
