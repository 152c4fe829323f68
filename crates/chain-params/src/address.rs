//! Base58check addresses built from a chain's version bytes

use crate::{Error, Result};

const PAYLOAD_LEN: usize = 1 + 20;

/// Kind of legacy address, selected by its version byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Pay to public key hash
    PubKeyHash,
    /// Pay to script hash
    ScriptHash,
}

/// Encode `version || hash160` with a 4-byte double-SHA256 checksum
pub fn encode_address(version: u8, hash160: &[u8; 20]) -> String {
    bs58::encode(hash160).with_check_version(version).into_string()
}

/// Decode a base58check address into its version byte and HASH160
pub fn decode_address(address: &str) -> Result<(u8, [u8; 20])> {
    let payload = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| Error::InvalidAddress(format!("{address}: {e}")))?;

    if payload.len() != PAYLOAD_LEN {
        return Err(Error::InvalidAddress(format!(
            "{address}: payload length {} (expected {PAYLOAD_LEN})",
            payload.len()
        )));
    }

    let mut hash160 = [0u8; 20];
    hash160.copy_from_slice(&payload[1..]);
    Ok((payload[0], hash160))
}
