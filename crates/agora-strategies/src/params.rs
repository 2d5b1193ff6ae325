//! Codecs for the opaque `additional_parameters` payloads.
//!
//! Each strategy documents its payload shape. All integers are fixed-width
//! little-endian; Merkle material is raw 32-byte words. Decoding failures
//! reject the order with `StrategyParamsInvalid` rather than guessing.

use agora_types::{AgoraError, Result};

/// Decode a 16-byte `u128` (prices, premiums, discounts).
pub fn read_u128(bytes: &[u8]) -> Result<u128> {
    let raw: [u8; 16] = bytes.try_into().map_err(|_| AgoraError::StrategyParamsInvalid {
        expected: 16,
        actual: bytes.len(),
    })?;
    Ok(u128::from_le_bytes(raw))
}

/// Decode an 8-byte `u64` (quantities).
pub fn read_u64(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| AgoraError::StrategyParamsInvalid {
        expected: 8,
        actual: bytes.len(),
    })?;
    Ok(u64::from_le_bytes(raw))
}

/// Decode a 32-byte Merkle root.
pub fn read_root(bytes: &[u8]) -> Result<[u8; 32]> {
    let raw: [u8; 32] = bytes.try_into().map_err(|_| AgoraError::StrategyParamsInvalid {
        expected: 32,
        actual: bytes.len(),
    })?;
    Ok(raw)
}

/// Decode a Merkle proof: zero or more concatenated 32-byte nodes.
pub fn read_proof(bytes: &[u8]) -> Result<Vec<[u8; 32]>> {
    if bytes.len() % 32 != 0 {
        return Err(AgoraError::StrategyParamsInvalid {
            expected: bytes.len().div_ceil(32) * 32,
            actual: bytes.len(),
        });
    }
    let mut proof = Vec::with_capacity(bytes.len() / 32);
    for chunk in bytes.chunks_exact(32) {
        let mut node = [0u8; 32];
        node.copy_from_slice(chunk);
        proof.push(node);
    }
    Ok(proof)
}

#[must_use]
pub fn encode_u128(value: u128) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

#[must_use]
pub fn encode_u64(value: u64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

#[must_use]
pub fn encode_root(root: [u8; 32]) -> Vec<u8> {
    root.to_vec()
}

#[must_use]
pub fn encode_proof(proof: &[[u8; 32]]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(proof.len() * 32);
    for node in proof {
        bytes.extend_from_slice(node);
    }
    bytes
}
