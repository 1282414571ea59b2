//! Authority signature verification.
//!
//! Signatures are 65-byte secp256k1 `r ‖ s ‖ v` over the 32-byte message
//! from [`crate::hash::compute_signature_message`]. The signer is identified
//! by its 20-byte address: the last 20 bytes of keccak256 of the
//! uncompressed public key without its 0x04 prefix.

use cosmwasm_std::Api;

use crate::error::ContractError;
use crate::hash::keccak256;

/// Derive the 20-byte address of an uncompressed (65-byte) public key.
pub fn pubkey_to_address(pubkey: &[u8]) -> Result<[u8; 20], ContractError> {
    if pubkey.len() != 65 || pubkey[0] != 0x04 {
        return Err(ContractError::InvalidSignature);
    }
    let hash = keccak256(&pubkey[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}

/// Recover the address that signed `message_hash`.
pub fn recover_signer(
    api: &dyn Api,
    message_hash: &[u8; 32],
    signature: &[u8],
) -> Result<[u8; 20], ContractError> {
    if signature.len() != 65 {
        return Err(ContractError::InvalidSignature);
    }

    let recovery_param = match signature[64] {
        0 | 1 => signature[64],
        27 | 28 => signature[64] - 27,
        _ => return Err(ContractError::InvalidSignature),
    };

    let pubkey = api
        .secp256k1_recover_pubkey(message_hash, &signature[..64], recovery_param)
        .map_err(|_| ContractError::InvalidSignature)?;

    pubkey_to_address(&pubkey)
}

/// Parse a hex authority address (with or without 0x prefix).
///
/// The zero address is rejected: no key recovers to it.
pub fn parse_authority(value: &str) -> Result<[u8; 20], ContractError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(value).map_err(|e| ContractError::InvalidAuthority {
        reason: e.to_string(),
    })?;
    let address: [u8; 20] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidAuthority {
            reason: format!("expected 20 bytes, got {}", bytes.len()),
        })?;
    if address == [0u8; 20] {
        return Err(ContractError::InvalidAuthority {
            reason: "zero address".to_string(),
        });
    }
    Ok(address)
}
