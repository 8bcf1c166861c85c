//! Message packing
//!
//! `MessagePacker` is the contract every builder packs through. `DbcPacker`
//! implements it strictly on top of the signal database: a frame must name
//! every signal of the layout, nothing else, and every value must fit both
//! its bit width and the DBC `[min|max]` range.

use crate::signals::database::{ByteOrder, MessageDefinition, SignalDefinition};
use crate::signals::{DatabaseStats, SignalDatabase};
use crate::types::{CanFrame, EncoderError, Result, SignalFrame, SignalValue};
use std::path::Path;

/// Encodes a signal mapping into the raw bytes of a named message
pub trait MessagePacker {
    fn pack(&self, message: &str, bus: u8, values: &SignalFrame) -> Result<CanFrame>;
}

impl<P: MessagePacker + ?Sized> MessagePacker for &P {
    fn pack(&self, message: &str, bus: u8, values: &SignalFrame) -> Result<CanFrame> {
        (**self).pack(message, bus, values)
    }
}

/// Packer backed by DBC message layouts
pub struct DbcPacker {
    signal_db: SignalDatabase,
}

impl DbcPacker {
    /// Create a packer with an empty database
    pub fn new() -> Self {
        Self {
            signal_db: SignalDatabase::new(),
        }
    }

    /// Load a DBC file and add its layouts to the database
    pub fn add_dbc(&mut self, path: &Path) -> Result<()> {
        log::info!("Loading DBC file: {:?}", path);

        let messages = crate::signals::dbc::parse_dbc_file(path)?;
        for message in messages {
            self.signal_db.add_message(message);
        }

        log::info!("DBC file loaded successfully: {:?}", path);
        Ok(())
    }

    /// Add layouts from DBC text held in memory
    pub fn add_dbc_str(&mut self, content: &str, source: &str) -> Result<()> {
        for message in crate::signals::dbc::parse_dbc_str(content, source)? {
            self.signal_db.add_message(message);
        }
        Ok(())
    }

    /// Build a packer from a single in-memory DBC
    pub fn from_dbc_str(content: &str) -> Result<Self> {
        let mut packer = Self::new();
        packer.add_dbc_str(content, "inline.dbc")?;
        Ok(packer)
    }

    /// Layout of a message, if loaded
    pub fn message(&self, name: &str) -> Option<&MessageDefinition> {
        self.signal_db.get_message_by_name(name)
    }

    /// Layout of a message by CAN ID, if loaded
    pub fn message_by_id(&self, can_id: u32) -> Option<&MessageDefinition> {
        self.signal_db.get_message(can_id)
    }

    /// CAN IDs of every loaded layout, sorted
    pub fn message_ids(&self) -> Vec<u32> {
        self.signal_db.get_all_can_ids()
    }

    /// Get statistics about the loaded signal database
    pub fn database_stats(&self) -> DatabaseStats {
        self.signal_db.stats()
    }

    /// Convert a physical value to its raw representation
    fn raw_value(message: &str, signal: &SignalDefinition, value: SignalValue) -> Result<u64> {
        let physical = value.as_f64();
        let raw = ((physical - signal.offset) / signal.factor).round();
        let (lo, hi) = signal.raw_range();

        let out_of_range = EncoderError::ValueOutOfRange {
            message: message.to_string(),
            signal: signal.name.clone(),
            value: physical,
        };

        if !raw.is_finite() || raw < lo as f64 || raw > hi as f64 {
            return Err(out_of_range);
        }

        if !signal.in_physical_range(physical) {
            log::debug!(
                "{}.{} = {}{} outside [{}|{}]",
                message,
                signal.name,
                physical,
                signal.unit.as_deref().unwrap_or(""),
                signal.min,
                signal.max
            );
            return Err(out_of_range);
        }

        let mask = if signal.length >= 64 {
            u64::MAX
        } else {
            (1u64 << signal.length) - 1
        };
        Ok((raw as i64 as u64) & mask)
    }

    /// Insert signal bits with little-endian (Intel) byte order
    ///
    /// Start bit is the LSB; bits run upward through consecutive bytes.
    fn insert_little_endian(data: &mut [u8], start_bit: usize, length: usize, raw: u64) {
        for i in 0..length {
            let bit_pos = start_bit + i;
            let byte_idx = bit_pos / 8;
            let bit_in_byte = bit_pos % 8;
            let bit_value = ((raw >> i) & 0x01) as u8;

            data[byte_idx] &= !(1 << bit_in_byte);
            data[byte_idx] |= bit_value << bit_in_byte;
        }
    }

    /// Insert signal bits with big-endian (Motorola) byte order
    ///
    /// Start bit is the MSB in DBC numbering (bit 0 = LSB of byte 0). Bits
    /// walk down within a byte, then continue at bit 7 of the next byte.
    fn insert_big_endian(data: &mut [u8], start_bit: usize, length: usize, raw: u64) {
        let mut bit_pos = start_bit;
        for i in 0..length {
            let byte_idx = bit_pos / 8;
            let bit_in_byte = bit_pos % 8;
            let bit_value = ((raw >> (length - 1 - i)) & 0x01) as u8;

            data[byte_idx] &= !(1 << bit_in_byte);
            data[byte_idx] |= bit_value << bit_in_byte;

            bit_pos = if bit_in_byte == 0 { bit_pos + 15 } else { bit_pos - 1 };
        }
    }

    /// Whether a signal fits within a frame of `size` bytes
    fn fits(signal: &SignalDefinition, size: usize) -> bool {
        let start = signal.start_bit as usize;
        let length = signal.length as usize;
        let last_byte = match signal.byte_order {
            ByteOrder::LittleEndian => (start + length).saturating_sub(1) / 8,
            ByteOrder::BigEndian => {
                let bits_in_first = start % 8 + 1;
                start / 8 + length.saturating_sub(bits_in_first).div_ceil(8)
            }
        };
        length > 0 && last_byte < size
    }
}

impl MessagePacker for DbcPacker {
    fn pack(&self, message: &str, bus: u8, values: &SignalFrame) -> Result<CanFrame> {
        let message_def = self
            .signal_db
            .get_message_by_name(message)
            .ok_or_else(|| EncoderError::MessageNotFound(message.to_string()))?;

        if let Some((name, _)) = values.iter().find(|(name, _)| message_def.signal(name).is_none()) {
            return Err(EncoderError::SignalNotFound {
                message: message.to_string(),
                signal: name.to_string(),
            });
        }

        let mut data = vec![0u8; message_def.size];
        for signal in &message_def.signals {
            let value = values.get(&signal.name).ok_or_else(|| EncoderError::MissingSignal {
                message: message.to_string(),
                signal: signal.name.clone(),
            })?;

            if !Self::fits(signal, data.len()) {
                return Err(EncoderError::DbcParseError(format!(
                    "Signal '{}' does not fit the {} bytes of {}",
                    signal.name, message_def.size, message
                )));
            }

            let raw = Self::raw_value(message, signal, value)?;
            let start_bit = signal.start_bit as usize;
            let length = signal.length as usize;
            match signal.byte_order {
                ByteOrder::LittleEndian => Self::insert_little_endian(&mut data, start_bit, length, raw),
                ByteOrder::BigEndian => Self::insert_big_endian(&mut data, start_bit, length, raw),
            }
        }

        log::trace!("Packed {} (0x{:X}) on bus {}: {:02X?}", message, message_def.id, bus, data);

        Ok(CanFrame {
            can_id: message_def.id,
            bus,
            data,
        })
    }
}

impl Default for DbcPacker {
    fn default() -> Self {
        Self::new()
    }
}
