//! Error types for the quorum bridge contract
//!
//! Vote outcomes that must persist (lazy expiry) or that change nothing
//! (duplicate votes) are reported through the response, not through this enum.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: caller is not a relayer")]
    NotRelayer,

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("System is paused")]
    SystemPaused,

    #[error("Domain not supported: {domain_id}")]
    DomainNotSupported { domain_id: u8 },

    #[error("Invalid destination domain: expected {expected}, got {got}")]
    InvalidDestination { expected: u8, got: u8 },

    #[error("Unknown resource: {resource_id}")]
    UnknownResource { resource_id: String },

    // ========================================================================
    // Proposal Lifecycle Errors
    // ========================================================================

    #[error("Proposal already finalized")]
    AlreadyFinalized,

    #[error("Proposal already passed")]
    AlreadyPassed,

    #[error("Proposal cannot be cancelled")]
    CannotCancel,

    #[error("Proposal has not passed")]
    ProposalNotPassed,

    #[error("Proposal not found")]
    ProposalNotFound,

    // ========================================================================
    // Execution Errors
    // ========================================================================

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Deposit already executed: origin {origin_domain_id}, nonce {deposit_nonce}")]
    AlreadyExecuted {
        origin_domain_id: u8,
        deposit_nonce: u64,
    },

    #[error("Effect failed: {reason}")]
    EffectFailed { reason: String },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },

    // ========================================================================
    // Deposit Errors
    // ========================================================================

    #[error("Asset does not match resource {resource_id}")]
    AssetMismatch { resource_id: String },

    #[error("Amount mismatch: payload carries {expected}, received {got}")]
    AmountMismatch { expected: Uint128, got: Uint128 },

    // ========================================================================
    // Relayer Set Errors
    // ========================================================================

    #[error("Relayer already registered")]
    RelayerAlreadyRegistered,

    #[error("Relayer not registered")]
    RelayerNotRegistered,

    #[error("Relayer set is full")]
    RelayerSetFull,

    #[error("Cannot remove relayer: {remaining} relayers would remain for threshold {threshold}")]
    CannotRemoveRelayer { remaining: u32, threshold: u32 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid threshold {threshold}: must be between 1 and {relayers}")]
    InvalidThreshold { threshold: u32, relayers: u32 },

    #[error("Invalid expiry: must be at least one block")]
    InvalidExpiry,

    #[error("Invalid domain id: {domain_id}")]
    InvalidDomainId { domain_id: u8 },

    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("Invalid authority: {reason}")]
    InvalidAuthority { reason: String },

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },
}
