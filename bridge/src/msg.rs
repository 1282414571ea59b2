//! Message types for the quorum bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::handler::ResourceHandler;
use crate::proposal::ProposalStatus;

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// This domain's identifier (non-zero)
    pub domain_id: u8,
    /// Initial relayer addresses
    pub relayers: Vec<String>,
    /// Distinct relayer votes needed to pass a proposal
    pub relayer_threshold: u32,
    /// Blocks after which a non-passed proposal can be cancelled
    pub expiry: u64,
    /// Hex address of the threshold-signing authority, if known at deploy time
    pub authority: Option<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Origin Side
    // ========================================================================
    /// Deposit native coins (unlock resources) or nothing (call resources)
    ///
    /// Authorization: Anyone
    Deposit {
        destination_domain_id: u8,
        /// 32-byte resource id
        resource_id: Binary,
        payload: Binary,
        fee_data: Option<Binary>,
    },

    /// Deposit CW20 tokens (called via CW20 send)
    Receive(cw20::Cw20ReceiveMsg),

    // ========================================================================
    // Destination Side
    // ========================================================================
    /// Vote yes on the proposal for a deposit
    ///
    /// Authorization: Relayer only
    ///
    /// The vote that reaches the threshold dispatches the handler effect.
    Vote {
        origin_domain_id: u8,
        deposit_nonce: u64,
        resource_id: Binary,
        payload: Binary,
    },

    /// Cancel an expired active proposal
    ///
    /// Authorization: Anyone
    Cancel {
        origin_domain_id: u8,
        deposit_nonce: u64,
        /// 32-byte proposal data hash
        data_hash: Binary,
    },

    /// Dispatch the effect of a passed proposal whose effect failed
    ///
    /// Authorization: Anyone
    ExecuteProposal {
        origin_domain_id: u8,
        deposit_nonce: u64,
        resource_id: Binary,
        payload: Binary,
    },

    /// Execute a deposit attested by the authority signature
    ///
    /// Authorization: Anyone holding a valid signature
    ExecuteWithSignature {
        origin_domain_id: u8,
        destination_domain_id: u8,
        deposit_nonce: u64,
        payload: Binary,
        resource_id: Binary,
        /// 65-byte secp256k1 signature (r ‖ s ‖ v)
        signature: Binary,
    },

    // ========================================================================
    // Relayer Set
    // ========================================================================
    /// Authorization: Admin only
    AddRelayer { relayer: String },

    /// Authorization: Admin only
    RemoveRelayer { relayer: String },

    /// Authorization: Admin only
    UpdateRelayerThreshold { threshold: u32 },

    /// Authorization: Admin only
    UpdateExpiry { expiry: u64 },

    // ========================================================================
    // Registries
    // ========================================================================
    /// Map a resource id to its handler
    ///
    /// Authorization: Admin only
    SetResource {
        resource_id: Binary,
        handler: ResourceHandler,
    },

    /// Authorization: Admin only
    RemoveResource { resource_id: Binary },

    /// Register a remote domain as a deposit destination
    ///
    /// Authorization: Admin only
    RegisterDomain { domain_id: u8, name: String },

    /// Authorization: Admin only
    UpdateDomain { domain_id: u8, enabled: bool },

    // ========================================================================
    // Admin
    // ========================================================================
    /// Configure the threshold-signing authority (hex address)
    ///
    /// Authorization: Admin only
    SetAuthority { authority: String },

    /// Authorization: Admin only
    Pause {},

    /// Authorization: Admin only
    Unpause {},
}

/// CW20 receive hook payload
#[cw_serde]
pub enum ReceiveMsg {
    /// Lock (unlock resources) or burn (mint resources) the sent tokens
    Deposit {
        destination_domain_id: u8,
        resource_id: Binary,
        payload: Binary,
        fee_data: Option<Binary>,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(IsExecutedResponse)]
    IsExecuted {
        origin_domain_id: u8,
        deposit_nonce: u64,
    },

    #[returns(Option<ExecutionRecordResponse>)]
    ExecutionRecord {
        origin_domain_id: u8,
        deposit_nonce: u64,
    },

    /// Never-voted proposals report `Inactive`
    #[returns(ProposalResponse)]
    Proposal {
        origin_domain_id: u8,
        deposit_nonce: u64,
        data_hash: Binary,
    },

    #[returns(HasVotedResponse)]
    HasVoted {
        origin_domain_id: u8,
        deposit_nonce: u64,
        data_hash: Binary,
        relayer: String,
    },

    #[returns(RelayersResponse)]
    Relayers {},

    #[returns(ResourceResponse)]
    Resource { resource_id: Binary },

    #[returns(ResourcesResponse)]
    Resources {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(DomainResponse)]
    Domain { domain_id: u8 },

    #[returns(DomainsResponse)]
    Domains {
        start_after: Option<u8>,
        limit: Option<u32>,
    },

    /// Last nonce assigned for an origin domain
    #[returns(NonceResponse)]
    DepositNonce { origin_domain_id: u8 },

    #[returns(DepositResponse)]
    Deposit {
        origin_domain_id: u8,
        deposit_nonce: u64,
    },

    #[returns(LockedBalanceResponse)]
    LockedBalance { asset: String },

    /// Data hash for a resource's handler and a payload
    #[returns(HashResponse)]
    DataHash { resource_id: Binary, payload: Binary },

    /// Message hash the authority signs
    #[returns(HashResponse)]
    SignatureMessage {
        origin_domain_id: u8,
        destination_domain_id: u8,
        deposit_nonce: u64,
        payload: Binary,
        resource_id: Binary,
    },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub domain_id: u8,
    pub relayer_threshold: u32,
    pub expiry: u64,
    pub authority: Option<String>,
}

#[cw_serde]
pub struct IsExecutedResponse {
    pub executed: bool,
}

#[cw_serde]
pub struct ExecutionRecordResponse {
    pub data_hash: Binary,
    pub payload_hash: Binary,
    pub resource_id: Binary,
    pub executed_at: u64,
}

#[cw_serde]
pub struct ProposalResponse {
    pub status: ProposalStatus,
    /// 32-byte vote set, bit i set when relayer index i voted yes
    pub yes_votes: Binary,
    pub yes_votes_total: u32,
    pub voters: Vec<u8>,
    pub proposed_block: u64,
    /// Whether the proposal is past its expiry window at the current height
    pub expired: bool,
}

#[cw_serde]
pub struct HasVotedResponse {
    pub voted: bool,
}

#[cw_serde]
pub struct RelayerInfo {
    pub address: Addr,
    pub index: u8,
}

#[cw_serde]
pub struct RelayersResponse {
    pub relayers: Vec<RelayerInfo>,
    pub threshold: u32,
}

#[cw_serde]
pub struct ResourceResponse {
    pub resource_id: Binary,
    pub handler: ResourceHandler,
}

#[cw_serde]
pub struct ResourcesResponse {
    pub resources: Vec<ResourceResponse>,
}

#[cw_serde]
pub struct DomainResponse {
    pub domain_id: u8,
    pub name: String,
    pub enabled: bool,
}

#[cw_serde]
pub struct DomainsResponse {
    pub domains: Vec<DomainResponse>,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

#[cw_serde]
pub struct DepositResponse {
    pub origin_domain_id: u8,
    pub destination_domain_id: u8,
    pub deposit_nonce: u64,
    pub resource_id: Binary,
    pub depositor: Addr,
    pub payload: Binary,
    pub payload_hash: Binary,
    pub fee_data: Binary,
    pub block_height: u64,
}

#[cw_serde]
pub struct LockedBalanceResponse {
    pub asset: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct HashResponse {
    pub hash: Binary,
    pub hex: String,
}
