//! Unsigned LEB128-style integers: 7 payload bits per byte, least
//! significant group first, high bit set on every byte but the last.

use crate::types::AssemblerError;

pub fn encode_varuint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    write_varuint(&mut out, value);
    out
}

pub fn write_varuint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decodes a varuint from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode_varuint(bytes: &[u8]) -> Result<(u64, usize), AssemblerError> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let shift = 7 * i as u32;
        let payload = u64::from(byte & 0x7f);
        if shift >= 64 || (shift == 63 && payload > 1) {
            return Err(AssemblerError::VarUintOverflow);
        }
        value |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(AssemblerError::TruncatedVarUint)
}
