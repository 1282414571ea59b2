//! Query handlers for the quorum bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::hash::{
    binary_to_bytes32, bytes32_to_hex, compute_data_hash, compute_signature_message, payload_hash,
};
use crate::msg::{
    ConfigResponse, DepositResponse, DomainResponse, DomainsResponse, ExecutionRecordResponse,
    HasVotedResponse, HashResponse, IsExecutedResponse, LockedBalanceResponse, NonceResponse,
    ProposalResponse, RelayerInfo, RelayersResponse, ResourceResponse, ResourcesResponse,
};
use crate::proposal::{self, ProposalStatus};
use crate::state::{
    DomainConfig, CONFIG, DEPOSITS, DEPOSIT_NONCES, DOMAINS, EXECUTED, LOCKED_BALANCES, RELAYERS,
    RESOURCES,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

fn to_bytes32(value: &Binary) -> StdResult<[u8; 32]> {
    binary_to_bytes32(value).map_err(|e| StdError::generic_err(e.to_string()))
}

fn hash_response(hash: [u8; 32]) -> HashResponse {
    HashResponse {
        hash: Binary::from(hash.to_vec()),
        hex: bytes32_to_hex(&hash),
    }
}

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        domain_id: config.domain_id,
        relayer_threshold: config.relayer_threshold,
        expiry: config.expiry,
        authority: config
            .authority
            .map(|address| format!("0x{}", hex::encode(address))),
    })
}

/// Query the relayer set with each relayer's vote index.
pub fn query_relayers(deps: Deps) -> StdResult<RelayersResponse> {
    let config = CONFIG.load(deps.storage)?;
    let relayers: Vec<RelayerInfo> = RELAYERS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            let (address, index) = item?;
            Ok(RelayerInfo { address, index })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RelayersResponse {
        relayers,
        threshold: config.relayer_threshold,
    })
}

// ============================================================================
// Execution & Proposal Queries
// ============================================================================

pub fn query_is_executed(
    deps: Deps,
    origin_domain_id: u8,
    deposit_nonce: u64,
) -> StdResult<IsExecutedResponse> {
    Ok(IsExecutedResponse {
        executed: EXECUTED.has(deps.storage, (origin_domain_id, deposit_nonce)),
    })
}

pub fn query_execution_record(
    deps: Deps,
    origin_domain_id: u8,
    deposit_nonce: u64,
) -> StdResult<Option<ExecutionRecordResponse>> {
    let record = EXECUTED.may_load(deps.storage, (origin_domain_id, deposit_nonce))?;
    Ok(record.map(|r| ExecutionRecordResponse {
        data_hash: Binary::from(r.data_hash.to_vec()),
        payload_hash: Binary::from(r.payload_hash.to_vec()),
        resource_id: Binary::from(r.resource_id.to_vec()),
        executed_at: r.executed_at,
    }))
}

/// Query a proposal. Keys with no record report `Inactive`.
pub fn query_proposal(
    deps: Deps,
    env: Env,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: Binary,
) -> StdResult<ProposalResponse> {
    let config = CONFIG.load(deps.storage)?;
    let data_hash = to_bytes32(&data_hash)?;

    let stored = proposal::get(deps.storage, origin_domain_id, deposit_nonce, &data_hash)?;
    let response = match stored {
        Some(p) => ProposalResponse {
            status: p.status,
            yes_votes: Binary::from(p.yes_votes.as_bytes().to_vec()),
            yes_votes_total: p.yes_votes_total,
            voters: p.yes_votes.indices(),
            proposed_block: p.proposed_block,
            expired: p.status == ProposalStatus::Active
                && p.is_expired(env.block.height, config.expiry),
        },
        None => ProposalResponse {
            status: ProposalStatus::Inactive,
            yes_votes: Binary::from(vec![0u8; 32]),
            yes_votes_total: 0,
            voters: vec![],
            proposed_block: 0,
            expired: false,
        },
    };
    Ok(response)
}

pub fn query_has_voted(
    deps: Deps,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: Binary,
    relayer: String,
) -> StdResult<HasVotedResponse> {
    let data_hash = to_bytes32(&data_hash)?;
    let relayer = deps.api.addr_validate(&relayer)?;

    let voted = match RELAYERS.may_load(deps.storage, &relayer)? {
        Some(index) => proposal::get(deps.storage, origin_domain_id, deposit_nonce, &data_hash)?
            .map(|p| p.has_voted(index))
            .unwrap_or(false),
        None => false,
    };
    Ok(HasVotedResponse { voted })
}

// ============================================================================
// Registry Queries
// ============================================================================

pub fn query_resource(deps: Deps, resource_id: Binary) -> StdResult<ResourceResponse> {
    let id = to_bytes32(&resource_id)?;
    let handler = RESOURCES
        .may_load(deps.storage, &id)?
        .ok_or_else(|| StdError::not_found(format!("resource {}", bytes32_to_hex(&id))))?;
    Ok(ResourceResponse {
        resource_id,
        handler,
    })
}

/// Query paginated list of resources.
pub fn query_resources(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<ResourcesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start: Option<Bound<&[u8]>> = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));

    let resources: Vec<ResourceResponse> = RESOURCES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (id, handler) = item?;
            Ok(ResourceResponse {
                resource_id: Binary::from(id),
                handler,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ResourcesResponse { resources })
}

fn domain_response(domain: DomainConfig) -> DomainResponse {
    DomainResponse {
        domain_id: domain.domain_id,
        name: domain.name,
        enabled: domain.enabled,
    }
}

pub fn query_domain(deps: Deps, domain_id: u8) -> StdResult<DomainResponse> {
    let domain = DOMAINS
        .may_load(deps.storage, domain_id)?
        .ok_or_else(|| StdError::not_found(format!("domain {}", domain_id)))?;
    Ok(domain_response(domain))
}

/// Query paginated list of domains.
pub fn query_domains(
    deps: Deps,
    start_after: Option<u8>,
    limit: Option<u32>,
) -> StdResult<DomainsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let domains: Vec<DomainResponse> = DOMAINS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, domain)| domain_response(domain)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(DomainsResponse { domains })
}

// ============================================================================
// Deposit Queries
// ============================================================================

/// Last nonce assigned for an origin domain (0 before the first deposit).
pub fn query_deposit_nonce(deps: Deps, origin_domain_id: u8) -> StdResult<NonceResponse> {
    let nonce = DEPOSIT_NONCES
        .may_load(deps.storage, origin_domain_id)?
        .unwrap_or(0);
    Ok(NonceResponse { nonce })
}

pub fn query_deposit(
    deps: Deps,
    origin_domain_id: u8,
    deposit_nonce: u64,
) -> StdResult<DepositResponse> {
    let record = DEPOSITS
        .may_load(deps.storage, (origin_domain_id, deposit_nonce))?
        .ok_or_else(|| {
            StdError::not_found(format!(
                "deposit {} from domain {}",
                deposit_nonce, origin_domain_id
            ))
        })?;

    Ok(DepositResponse {
        origin_domain_id: record.origin_domain_id,
        destination_domain_id: record.destination_domain_id,
        deposit_nonce: record.deposit_nonce,
        resource_id: Binary::from(record.resource_id.to_vec()),
        depositor: record.depositor,
        payload_hash: Binary::from(payload_hash(&record.payload).to_vec()),
        payload: record.payload,
        fee_data: record.fee_data,
        block_height: record.block_height,
    })
}

/// Query locked balance for an asset (denom or CW20 address).
pub fn query_locked_balance(deps: Deps, asset: String) -> StdResult<LockedBalanceResponse> {
    let amount = LOCKED_BALANCES
        .may_load(deps.storage, asset.clone())?
        .unwrap_or_default();
    Ok(LockedBalanceResponse { asset, amount })
}

// ============================================================================
// Hash Computation Queries
// ============================================================================

/// Compute the proposal data hash for a registered resource and payload.
pub fn query_data_hash(
    deps: Deps,
    resource_id: Binary,
    payload: Binary,
) -> StdResult<HashResponse> {
    let id = to_bytes32(&resource_id)?;
    let handler = RESOURCES
        .may_load(deps.storage, &id)?
        .ok_or_else(|| StdError::not_found(format!("resource {}", bytes32_to_hex(&id))))?;
    Ok(hash_response(compute_data_hash(&handler.address(), &payload)))
}

/// Compute the message an authority signs for a deposit.
pub fn query_signature_message(
    origin_domain_id: u8,
    destination_domain_id: u8,
    deposit_nonce: u64,
    payload: Binary,
    resource_id: Binary,
) -> StdResult<HashResponse> {
    let resource_id = to_bytes32(&resource_id)?;
    Ok(hash_response(compute_signature_message(
        origin_domain_id,
        destination_domain_id,
        deposit_nonce,
        &payload,
        &resource_id,
    )))
}
