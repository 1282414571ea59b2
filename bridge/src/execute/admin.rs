//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause contract
//! - Threshold-signing authority configuration

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::error::ContractError;
use crate::execute::config::load_admin_config;
use crate::signature::parse_authority;
use crate::state::CONFIG;

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the contract (stops deposits and execution; cancellation stays open).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = load_admin_config(deps.storage, &info)?;

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

/// Unpause the contract.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = load_admin_config(deps.storage, &info)?;

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Authority
// ============================================================================

/// Set or rotate the address whose signatures authorize execution.
pub fn execute_set_authority(
    deps: DepsMut,
    info: MessageInfo,
    authority: String,
) -> Result<Response, ContractError> {
    let mut config = load_admin_config(deps.storage, &info)?;

    let address = parse_authority(&authority)?;
    config.authority = Some(address);
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_authority")
        .add_attribute("authority", format!("0x{}", hex::encode(address))))
}
