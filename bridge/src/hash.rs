//! Hash computation for proposal identity and signed attestations
//!
//! # Data hash
//! Binds a proposal to one handler and one payload:
//! `keccak256(handler_address_bytes ‖ payload)`
//!
//! # Signature message (160 bytes, ABI-style words)
//! - Bytes 0-31:    origin domain id (uint8, left-padded)
//! - Bytes 32-63:   destination domain id (uint8, left-padded)
//! - Bytes 64-95:   deposit nonce (uint64, big-endian, left-padded)
//! - Bytes 96-127:  keccak256(payload)
//! - Bytes 128-159: resource id (bytes32)

use cosmwasm_std::Binary;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Content hash identifying a proposal's handler and payload.
pub fn compute_data_hash(handler_address: &str, payload: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(handler_address.as_bytes());
    hasher.update(payload);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Hash of a deposit payload, carried in deposit and execution events.
pub fn payload_hash(payload: &[u8]) -> [u8; 32] {
    keccak256(payload)
}

/// Canonical message hash signed by the bridge authority.
pub fn compute_signature_message(
    origin_domain_id: u8,
    destination_domain_id: u8,
    deposit_nonce: u64,
    payload: &[u8],
    resource_id: &[u8; 32],
) -> [u8; 32] {
    let mut data = [0u8; 160];

    data[31] = origin_domain_id;
    data[63] = destination_domain_id;

    // uint64 nonce goes into bytes 24-31 of its word
    data[64 + 24..96].copy_from_slice(&deposit_nonce.to_be_bytes());

    data[96..128].copy_from_slice(&payload_hash(payload));
    data[128..160].copy_from_slice(resource_id);

    keccak256(&data)
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Interpret a message `Binary` as a 32-byte identifier.
pub fn binary_to_bytes32(value: &Binary) -> Result<[u8; 32], ContractError> {
    value
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: value.len() })
}
