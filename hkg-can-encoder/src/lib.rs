//! HKG CAN Encoder Library
//!
//! A stateless library that builds byte-exact outbound CAN frames for
//! Hyundai, Kia and Genesis ECUs: lane-keep and steering (LKAS11, MDPS12),
//! cluster buttons and HUD icons (CLU11, LFAHDA_MFC), and the smart cruise
//! control set (SCC11-14, FCA11/12, FRT_RADAR11).
//!
//! # Architecture
//!
//! - `checksum`: the checksum algorithms and rolling counters the ECUs check
//! - `vehicle`: per-vehicle checksum class and LKAS11 override rules
//! - `builders`: one pure builder per message type
//! - `packer`: the `MessagePacker` contract and a DBC-backed implementation
//!
//! The library does NOT:
//! - Decide driving behavior (torque, acceleration and jerk come from the caller)
//! - Decode inbound frames
//! - Schedule or transmit frames
//!
//! Previous-frame snapshots and frame indices are owned by the caller; the
//! encoder never keeps them between calls.
//!
//! # Example Usage
//!
//! ```no_run
//! use hkg_can_encoder::{AccCommand, DbcPacker, Encoder, EncoderConfig, VehicleId};
//! use std::path::Path;
//!
//! let mut packer = DbcPacker::new();
//! packer.add_dbc(Path::new("hyundai_kia_generic.dbc")).unwrap();
//!
//! let config = EncoderConfig::new(VehicleId::Sonata).with_radar_disable(true);
//! let encoder = Encoder::new(packer, config);
//!
//! let cmd = AccCommand { enabled: true, accel: 0.5, set_speed: 90.0, ..Default::default() };
//! for frame in encoder.acc_commands(42, &cmd, None).unwrap() {
//!     println!("{}", frame);
//! }
//! ```

// Public modules
pub mod builders;
pub mod checksum;
pub mod config;
pub mod encoder;
pub mod packer;
pub mod types;
pub mod vehicle;

// Re-export main types for convenience
pub use builders::{AccCommand, HdaCommand, LkasCommand};
pub use checksum::ChecksumClass;
pub use config::EncoderConfig;
pub use encoder::Encoder;
pub use packer::{DbcPacker, MessagePacker};
pub use signals::{ByteOrder, DatabaseStats, MessageDefinition, SignalDefinition, ValueType};
pub use types::{CanFrame, EncoderError, Result, SignalFrame, SignalValue};
pub use vehicle::{LkasVariant, VehicleId, VehicleProfile};

// Internal modules (not exposed in public API)
mod signals;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Layouts of every message this library emits
pub const HYUNDAI_KIA_GENERIC_DBC: &str = include_str!("../dbc/hyundai_kia_generic.dbc");
