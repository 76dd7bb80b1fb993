//! Account address decoding for the `addr` pseudo-op.

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

use crate::types::AssemblerError;

pub const PUBLIC_KEY_LEN: usize = 32;
pub const CHECKSUM_LEN: usize = 4;
/// Length of the textual form: base32 of key plus checksum, unpadded.
pub const ADDRESS_LEN: usize = 58;

/// Turns a human-readable address into the raw bytes pushed by `addr`.
pub trait AddressDecoder {
    fn decode_address(&self, address: &str) -> Result<Vec<u8>, AssemblerError>;
}

/// Decodes the standard account address form: unpadded base32 of a 32-byte
/// public key followed by the last four bytes of its SHA-512/256 digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumAddressDecoder;

impl AddressDecoder for ChecksumAddressDecoder {
    fn decode_address(&self, address: &str) -> Result<Vec<u8>, AssemblerError> {
        let invalid = |reason: String| AssemblerError::InvalidAddress {
            address: address.to_string(),
            reason,
        };
        if address.len() != ADDRESS_LEN {
            return Err(invalid(format!(
                "expected {ADDRESS_LEN} characters, got {}",
                address.len()
            )));
        }
        let raw = BASE32_NOPAD
            .decode(address.as_bytes())
            .map_err(|e| invalid(e.to_string()))?;
        if raw.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
            return Err(invalid(format!("decoded to {} bytes", raw.len())));
        }
        let (key, checksum) = raw.split_at(PUBLIC_KEY_LEN);
        if checksum != address_checksum(key) {
            return Err(invalid("checksum mismatch".to_string()));
        }
        Ok(key.to_vec())
    }
}

fn address_checksum(key: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha512_256::digest(key);
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    checksum
}

/// Renders a 32-byte public key in the textual address form.
pub fn encode_address(key: &[u8; PUBLIC_KEY_LEN]) -> String {
    let mut raw = Vec::with_capacity(PUBLIC_KEY_LEN + CHECKSUM_LEN);
    raw.extend_from_slice(key);
    raw.extend_from_slice(&address_checksum(key));
    BASE32_NOPAD.encode(&raw)
}
