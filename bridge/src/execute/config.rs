//! Configuration management handlers.
//!
//! This module handles:
//! - Relayer set management (add/remove, threshold)
//! - Proposal expiry window
//! - Resource registry (set/remove)
//! - Domain registry (register/update)

use common::AssetInfo;
use cosmwasm_std::{Addr, Api, Binary, DepsMut, MessageInfo, Response, Storage};

use crate::error::ContractError;
use crate::handler::ResourceHandler;
use crate::hash::{binary_to_bytes32, bytes32_to_hex};
use crate::state::{
    Config, DomainConfig, CONFIG, DOMAINS, MAX_RELAYERS, NEXT_RELAYER_INDEX, RELAYERS,
    RELAYER_COUNT, RELAYER_INDICES, RESOURCES,
};

/// Load the config, failing unless `info.sender` is the admin.
pub(crate) fn load_admin_config(
    storage: &dyn Storage,
    info: &MessageInfo,
) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

// ============================================================================
// Relayer Set
// ============================================================================

/// Register a relayer; a returning relayer keeps its previous vote index.
pub fn execute_add_relayer(
    deps: DepsMut,
    info: MessageInfo,
    relayer: String,
) -> Result<Response, ContractError> {
    load_admin_config(deps.storage, &info)?;

    let relayer_addr = deps.api.addr_validate(&relayer)?;
    if RELAYERS.has(deps.storage, &relayer_addr) {
        return Err(ContractError::RelayerAlreadyRegistered);
    }

    let index = register_relayer(deps.storage, &relayer_addr)?;

    Ok(Response::new()
        .add_attribute("method", "add_relayer")
        .add_attribute("relayer", relayer)
        .add_attribute("index", index.to_string()))
}

/// Remove a relayer; its index stays reserved for that address.
pub fn execute_remove_relayer(
    deps: DepsMut,
    info: MessageInfo,
    relayer: String,
) -> Result<Response, ContractError> {
    let config = load_admin_config(deps.storage, &info)?;

    let relayer_addr = deps.api.addr_validate(&relayer)?;
    if !RELAYERS.has(deps.storage, &relayer_addr) {
        return Err(ContractError::RelayerNotRegistered);
    }

    let count = RELAYER_COUNT.load(deps.storage)?;
    let remaining = count - 1;
    if remaining < config.relayer_threshold {
        return Err(ContractError::CannotRemoveRelayer {
            remaining,
            threshold: config.relayer_threshold,
        });
    }

    RELAYERS.remove(deps.storage, &relayer_addr);
    RELAYER_COUNT.save(deps.storage, &remaining)?;

    Ok(Response::new()
        .add_attribute("method", "remove_relayer")
        .add_attribute("relayer", relayer)
        .add_attribute("relayer_count", remaining.to_string()))
}

/// Update the number of votes needed to pass a proposal.
pub fn execute_update_relayer_threshold(
    deps: DepsMut,
    info: MessageInfo,
    threshold: u32,
) -> Result<Response, ContractError> {
    let mut config = load_admin_config(deps.storage, &info)?;

    let relayers = RELAYER_COUNT.load(deps.storage)?;
    validate_threshold(threshold, relayers)?;

    let old_threshold = config.relayer_threshold;
    config.relayer_threshold = threshold;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_relayer_threshold")
        .add_attribute("old_threshold", old_threshold.to_string())
        .add_attribute("new_threshold", threshold.to_string()))
}

/// Update the proposal expiry window, in blocks.
pub fn execute_update_expiry(
    deps: DepsMut,
    info: MessageInfo,
    expiry: u64,
) -> Result<Response, ContractError> {
    let mut config = load_admin_config(deps.storage, &info)?;

    if expiry == 0 {
        return Err(ContractError::InvalidExpiry);
    }

    config.expiry = expiry;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_expiry")
        .add_attribute("expiry", expiry.to_string()))
}

// ============================================================================
// Resource Registry
// ============================================================================

/// Map a resource id to its handler, replacing any previous handler.
pub fn execute_set_resource(
    deps: DepsMut,
    info: MessageInfo,
    resource_id: Binary,
    handler: ResourceHandler,
) -> Result<Response, ContractError> {
    load_admin_config(deps.storage, &info)?;

    let resource_id = binary_to_bytes32(&resource_id)?;
    let handler = validate_handler(deps.api, handler)?;
    RESOURCES.save(deps.storage, &resource_id, &handler)?;

    Ok(Response::new()
        .add_attribute("method", "set_resource")
        .add_attribute("resource_id", bytes32_to_hex(&resource_id))
        .add_attribute("handler", handler.kind())
        .add_attribute("handler_address", handler.address()))
}

pub fn execute_remove_resource(
    deps: DepsMut,
    info: MessageInfo,
    resource_id: Binary,
) -> Result<Response, ContractError> {
    load_admin_config(deps.storage, &info)?;

    let resource_id = binary_to_bytes32(&resource_id)?;
    if !RESOURCES.has(deps.storage, &resource_id) {
        return Err(ContractError::UnknownResource {
            resource_id: bytes32_to_hex(&resource_id),
        });
    }
    RESOURCES.remove(deps.storage, &resource_id);

    Ok(Response::new()
        .add_attribute("method", "remove_resource")
        .add_attribute("resource_id", bytes32_to_hex(&resource_id)))
}

// ============================================================================
// Domain Registry
// ============================================================================

/// Register a remote domain as a deposit destination.
pub fn execute_register_domain(
    deps: DepsMut,
    info: MessageInfo,
    domain_id: u8,
    name: String,
) -> Result<Response, ContractError> {
    let config = load_admin_config(deps.storage, &info)?;

    if domain_id == 0 || domain_id == config.domain_id {
        return Err(ContractError::InvalidDomainId { domain_id });
    }

    let domain = DomainConfig {
        domain_id,
        name: name.clone(),
        enabled: true,
    };
    DOMAINS.save(deps.storage, domain_id, &domain)?;

    Ok(Response::new()
        .add_attribute("method", "register_domain")
        .add_attribute("domain_id", domain_id.to_string())
        .add_attribute("name", name))
}

/// Enable or disable a registered domain.
pub fn execute_update_domain(
    deps: DepsMut,
    info: MessageInfo,
    domain_id: u8,
    enabled: bool,
) -> Result<Response, ContractError> {
    load_admin_config(deps.storage, &info)?;

    let mut domain = DOMAINS
        .may_load(deps.storage, domain_id)?
        .ok_or(ContractError::DomainNotSupported { domain_id })?;

    domain.enabled = enabled;
    DOMAINS.save(deps.storage, domain_id, &domain)?;

    Ok(Response::new()
        .add_attribute("method", "update_domain")
        .add_attribute("domain_id", domain_id.to_string())
        .add_attribute("enabled", enabled.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn validate_threshold(threshold: u32, relayers: u32) -> Result<(), ContractError> {
    if threshold == 0 || threshold > relayers {
        return Err(ContractError::InvalidThreshold {
            threshold,
            relayers,
        });
    }
    Ok(())
}

/// Give `relayer` its vote index and bump the relayer count.
///
/// An address keeps the index it was first assigned, so votes it cast before
/// a removal still occupy its bit after it is re-added.
pub fn register_relayer(
    storage: &mut dyn Storage,
    relayer: &Addr,
) -> Result<u8, ContractError> {
    let index = match RELAYER_INDICES.may_load(storage, relayer)? {
        Some(index) => index,
        None => {
            let next = NEXT_RELAYER_INDEX.may_load(storage)?.unwrap_or(0);
            if next >= MAX_RELAYERS {
                return Err(ContractError::RelayerSetFull);
            }
            let index = next as u8;
            RELAYER_INDICES.save(storage, relayer, &index)?;
            NEXT_RELAYER_INDEX.save(storage, &(next + 1))?;
            index
        }
    };

    RELAYERS.save(storage, relayer, &index)?;

    let count = RELAYER_COUNT.may_load(storage)?.unwrap_or(0);
    RELAYER_COUNT.save(storage, &(count + 1))?;

    Ok(index)
}

/// Handler addresses are validated here so dispatch can trust them.
fn validate_handler(
    api: &dyn Api,
    handler: ResourceHandler,
) -> Result<ResourceHandler, ContractError> {
    let validated = match handler {
        ResourceHandler::Mint { token } => ResourceHandler::Mint {
            token: api.addr_validate(token.as_str())?,
        },
        ResourceHandler::Unlock { asset } => {
            if let AssetInfo::Cw20 { contract_addr } = &asset {
                api.addr_validate(contract_addr.as_str())?;
            }
            ResourceHandler::Unlock { asset }
        }
        ResourceHandler::Call { contract } => ResourceHandler::Call {
            contract: api.addr_validate(contract.as_str())?,
        },
    };
    Ok(validated)
}
