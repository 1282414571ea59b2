//! State definitions for the quorum bridge contract
//!
//! Storage for configuration, the relayer set, the domain and resource
//! registries, origin-side deposits, and the execution replay guard.
//! Proposals live in [`crate::proposal`].

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use crate::handler::ResourceHandler;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the bridge is currently paused
    pub paused: bool,
    /// This domain's identifier
    pub domain_id: u8,
    /// Number of distinct relayer votes needed to pass a proposal
    pub relayer_threshold: u32,
    /// Blocks after which a non-passed proposal can be cancelled
    pub expiry: u64,
    /// 20-byte address of the threshold-signing authority, once configured
    pub authority: Option<[u8; 20]>,
}

/// Registered remote domain
#[cw_serde]
pub struct DomainConfig {
    pub domain_id: u8,
    pub name: String,
    pub enabled: bool,
}

/// Deposit made on this domain, addressed to a remote one.
#[cw_serde]
pub struct DepositRecord {
    pub origin_domain_id: u8,
    pub destination_domain_id: u8,
    pub deposit_nonce: u64,
    pub resource_id: [u8; 32],
    pub depositor: Addr,
    pub payload: Binary,
    pub fee_data: Binary,
    pub block_height: u64,
}

/// Replay guard entry, set once a deposit's effect has been dispatched.
#[cw_serde]
pub struct ExecutionRecord {
    pub data_hash: [u8; 32],
    pub payload_hash: [u8; 32],
    pub resource_id: [u8; 32],
    pub executed_at: u64,
}

/// Which path dispatched the effect currently awaiting its reply.
#[cw_serde]
pub enum DispatchSource {
    Vote,
    Recovery,
    Signature,
}

/// Effect in flight between dispatch and reply.
#[cw_serde]
pub struct PendingDispatch {
    pub source: DispatchSource,
    pub origin_domain_id: u8,
    pub destination_domain_id: u8,
    pub deposit_nonce: u64,
    pub data_hash: [u8; 32],
    pub payload_hash: [u8; 32],
    /// Locked balance released by the effect: (asset key, amount)
    pub released: Option<(String, Uint128)>,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:quorum-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Relayer indices are bit positions in a 256-bit vote set
pub const MAX_RELAYERS: u16 = 256;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Registered remote domains
pub const DOMAINS: Map<u8, DomainConfig> = Map::new("domains");

/// Resource id => handler
pub const RESOURCES: Map<&[u8], ResourceHandler> = Map::new("resources");

/// Token balances locked in the bridge
/// Key: asset key (denom or CW20 address), Value: locked amount
pub const LOCKED_BALANCES: Map<String, Uint128> = Map::new("locked_balances");

// ============================================================================
// Relayer Set
// ============================================================================

/// Active relayers: address => bit index in proposal vote sets
pub const RELAYERS: Map<&Addr, u8> = Map::new("relayers");

/// Every index ever assigned, kept after removal so a re-added relayer
/// gets its old bit back
pub const RELAYER_INDICES: Map<&Addr, u8> = Map::new("relayer_indices");

/// Number of registered relayers
pub const RELAYER_COUNT: Item<u32> = Item::new("relayer_count");

/// Next unassigned relayer index; an index never moves to another address
pub const NEXT_RELAYER_INDEX: Item<u16> = Item::new("next_relayer_index");

// ============================================================================
// Deposits & Execution
// ============================================================================

/// Last nonce assigned per origin domain
pub const DEPOSIT_NONCES: Map<u8, u64> = Map::new("deposit_nonces");

/// Deposits by (origin domain, nonce)
pub const DEPOSITS: Map<(u8, u64), DepositRecord> = Map::new("deposits");

/// Execution records by (origin domain, nonce), shared by every dispatch path
pub const EXECUTED: Map<(u8, u64), ExecutionRecord> = Map::new("executed");

/// Effects awaiting their reply, by reply id
pub const PENDING_DISPATCHES: Map<u64, PendingDispatch> = Map::new("pending_dispatches");

/// Last reply id handed to a dispatched effect
pub const LAST_REPLY_ID: Item<u64> = Item::new("last_reply_id");

/// Assign the next deposit nonce for `origin_domain_id`, starting at 1.
pub fn assign_nonce(storage: &mut dyn Storage, origin_domain_id: u8) -> StdResult<u64> {
    let nonce = DEPOSIT_NONCES
        .may_load(storage, origin_domain_id)?
        .unwrap_or(0)
        + 1;
    DEPOSIT_NONCES.save(storage, origin_domain_id, &nonce)?;
    Ok(nonce)
}

/// Reserve a reply id for a dispatched effect, starting at 1.
pub fn next_reply_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = LAST_REPLY_ID.may_load(storage)?.unwrap_or(0) + 1;
    LAST_REPLY_ID.save(storage, &id)?;
    Ok(id)
}
