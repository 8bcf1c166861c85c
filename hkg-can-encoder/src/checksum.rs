//! Checksum and rolling-counter engine
//!
//! Pure functions over packed frame bytes and frame indices. Nothing in here
//! can fail: every input is a byte slice that came out of a successful pack.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte index of `CF_Lkas_Chksum` inside LKAS11
pub const LKAS11_CHECKSUM_BYTE: usize = 6;

/// CRC-8 polynomial 0x11D in its 8-bit MSB-first form
const HKG_CRC8_POLY: u8 = 0x1D;
/// Checksum of an empty input
const HKG_CRC8_INIT: u8 = 0xFD;
const HKG_CRC8_XOR_OUT: u8 = 0xDF;

/// LKAS11 checksum algorithm used by a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumClass {
    /// CRC-8 over bytes 0-5 and 7 (2019 Santa Fe and newer platforms)
    Crc8,
    /// Sum of bytes 0-5 (2018 Sorento)
    Sum6,
    /// Sum of bytes 0-5 plus byte 7 (2018 Stinger)
    Sum6Plus7,
}

impl ChecksumClass {
    /// Compute the LKAS11 checksum over a packed frame whose checksum byte is zero
    pub fn compute(self, data: &[u8]) -> u8 {
        let checksum = match self {
            ChecksumClass::Crc8 => lkas_crc8(data),
            ChecksumClass::Sum6 => sum6(data),
            ChecksumClass::Sum6Plus7 => sum6_plus7(data),
        };
        log::trace!("LKAS11 {} checksum over {:02X?} = 0x{:02X}", self, data, checksum);
        checksum
    }
}

impl fmt::Display for ChecksumClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumClass::Crc8 => write!(f, "CRC8"),
            ChecksumClass::Sum6 => write!(f, "6B"),
            ChecksumClass::Sum6Plus7 => write!(f, "7B"),
        }
    }
}

/// MSB-first CRC-8
///
/// `init` follows the convention where it is the CRC of an empty input, so
/// the shift register is seeded with `init ^ xor_out`.
pub fn crc8_parameterised(data: &[u8], polynomial: u8, init: u8, xor_out: u8) -> u8 {
    let mut crc = init ^ xor_out;

    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ polynomial;
            } else {
                crc <<= 1;
            }
        }
    }

    crc ^ xor_out
}

/// CRC-8 variant over an 8-byte LKAS11 frame
///
/// Byte 6 holds the checksum and is dropped; byte 7 takes its place.
pub fn lkas_crc8(data: &[u8]) -> u8 {
    let reduced: Vec<u8> = data
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != LKAS11_CHECKSUM_BYTE)
        .map(|(_, b)| *b)
        .take(7)
        .collect();
    crc8_parameterised(&reduced, HKG_CRC8_POLY, HKG_CRC8_INIT, HKG_CRC8_XOR_OUT)
}

/// Sum of bytes 0-5, modulo 256
pub fn sum6(data: &[u8]) -> u8 {
    byte_sum(&data[..data.len().min(6)])
}

/// Sum of bytes 0-5 plus byte 7, modulo 256
pub fn sum6_plus7(data: &[u8]) -> u8 {
    let trailing = data.get(7).copied().unwrap_or(0);
    sum6(data).wrapping_add(trailing)
}

/// Sum of every byte, modulo 256
pub fn byte_sum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// 4-bit checksum: the value that brings the sum of all nibbles to 0 mod 16
pub fn nibble_checksum(data: &[u8]) -> u8 {
    let nibbles: u32 = data
        .iter()
        .map(|&b| u32::from(b >> 4) + u32::from(b & 0x0F))
        .sum();
    ((16 - nibbles % 16) % 16) as u8
}

/// 4-bit alive counter
pub fn alive_counter(frame: u64) -> u8 {
    (frame % 16) as u8
}

/// 8-bit message counter
pub fn message_counter(frame: u64) -> u8 {
    (frame % 256) as u8
}

/// Next value of a 4-bit counter carried forward from a previous frame
pub fn increment_alive(previous: i64) -> u8 {
    ((previous.rem_euclid(16) + 1) % 16) as u8
}

/// FCA11 alive pattern: 2, 1, 0, 3, repeating
///
/// Phase-aligned to the supplemental counter (`frame % 16`).
pub fn fca_alive_pattern(frame: u64) -> u8 {
    let supplemental = i64::from(alive_counter(frame));
    (-(supplemental + 2)).rem_euclid(4) as u8
}

/// `CR_FCA_Alive` field value: the 2-bit pattern above a constant low bit
pub fn fca_alive_field(frame: u64) -> u8 {
    (fca_alive_pattern(frame) << 2) | 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty_input_is_init() {
        assert_eq!(
            crc8_parameterised(&[], HKG_CRC8_POLY, HKG_CRC8_INIT, HKG_CRC8_XOR_OUT),
            0xFD
        );
    }

    #[test]
    fn test_crc8_reference_vector() {
        assert_eq!(
            crc8_parameterised(&[1, 2, 3, 4, 5, 6, 7], HKG_CRC8_POLY, HKG_CRC8_INIT, HKG_CRC8_XOR_OUT),
            0x44
        );
    }

    #[test]
    fn test_lkas_crc8_skips_checksum_byte() {
        // Byte 6 must not influence the result
        let a = [1, 2, 3, 4, 5, 6, 0x00, 7];
        let b = [1, 2, 3, 4, 5, 6, 0xEE, 7];
        assert_eq!(lkas_crc8(&a), lkas_crc8(&b));
        assert_eq!(lkas_crc8(&a), 0x44);
    }

    #[test]
    fn test_checksums_are_deterministic() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0x00, 0xF0];
        for class in [ChecksumClass::Crc8, ChecksumClass::Sum6, ChecksumClass::Sum6Plus7] {
            assert_eq!(class.compute(&data), class.compute(&data));
        }
    }

    #[test]
    fn test_sum_variants() {
        let data = [0xFF, 0x01, 0x10, 0x20, 0x30, 0x40, 0x00, 0x05];
        // 0xFF + 0x01 wraps to 0, then 0x10 + 0x20 + 0x30 + 0x40 = 0xA0
        assert_eq!(sum6(&data), 0xA0);
        assert_eq!(sum6_plus7(&data), 0xA5);
        assert_eq!(ChecksumClass::Sum6.compute(&data), 0xA0);
        assert_eq!(ChecksumClass::Sum6Plus7.compute(&data), 0xA5);
    }

    #[test]
    fn test_byte_sum_wraps() {
        assert_eq!(byte_sum(&[0x80, 0x80, 0x01]), 0x01);
        assert_eq!(byte_sum(&[]), 0);
    }

    #[test]
    fn test_nibble_checksum_zeroes_total() {
        let frames: [&[u8]; 4] = [
            &[0x00; 8],
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0x00],
            &[0xFF; 8],
            &[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ];
        for data in frames {
            let checksum = nibble_checksum(data);
            assert!(checksum < 16);
            let nibbles: u32 = data.iter().map(|&b| u32::from(b >> 4) + u32::from(b & 0xF)).sum();
            assert_eq!((nibbles + u32::from(checksum)) % 16, 0);
        }
        // A frame whose nibbles already sum to 0 mod 16 keeps a zero checksum
        assert_eq!(nibble_checksum(&[0x00; 8]), 0);
    }

    #[test]
    fn test_alive_counter_sequence() {
        let seq: Vec<u8> = (0..32).map(alive_counter).collect();
        let expected: Vec<u8> = (0..16).chain(0..16).collect();
        assert_eq!(seq, expected);
    }

    #[test]
    fn test_message_counter_wraps_at_256() {
        assert_eq!(message_counter(255), 255);
        assert_eq!(message_counter(256), 0);
        assert_eq!(message_counter(513), 1);
    }

    #[test]
    fn test_increment_alive() {
        assert_eq!(increment_alive(0), 1);
        assert_eq!(increment_alive(14), 15);
        assert_eq!(increment_alive(15), 0);
        assert_eq!(increment_alive(-1), 0);
    }

    #[test]
    fn test_increment_alive_extremes() {
        // i64::MAX is 15 mod 16, i64::MIN is 0 mod 16
        assert_eq!(increment_alive(i64::MAX), 0);
        assert_eq!(increment_alive(i64::MIN), 1);
        assert_eq!(increment_alive(i64::MAX - 1), 15);
    }

    #[test]
    fn test_fca_alive_pattern() {
        let seq: Vec<u8> = (0..16).map(fca_alive_pattern).collect();
        assert_eq!(seq, vec![2, 1, 0, 3, 2, 1, 0, 3, 2, 1, 0, 3, 2, 1, 0, 3]);
        // Stays aligned across the supplemental counter wrap
        assert_eq!(fca_alive_pattern(16), 2);
    }

    #[test]
    fn test_fca_alive_field_sets_low_bit() {
        assert_eq!(fca_alive_field(0), 0b1001);
        assert_eq!(fca_alive_field(1), 0b0101);
        assert_eq!(fca_alive_field(2), 0b0001);
        assert_eq!(fca_alive_field(3), 0b1101);
    }
}
