//! Origin-side deposit handlers (Deposit and Receive).
//!
//! A deposit is assigned the next nonce with this domain as origin. Relayers
//! watching the `deposit` event carry it to the destination domain.

use common::AssetInfo;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo,
    Response, Storage, Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};

use crate::error::ContractError;
use crate::execute::dispatch::adjust_locked;
use crate::handler::{ResourceHandler, TokenPayload};
use crate::hash::{binary_to_bytes32, bytes32_to_hex, payload_hash};
use crate::msg::ReceiveMsg;
use crate::state::{assign_nonce, Config, DepositRecord, CONFIG, DEPOSITS, DOMAINS, RESOURCES};

/// Deposit details shared by the native and CW20 entry points.
struct DepositRequest {
    depositor: Addr,
    destination_domain_id: u8,
    resource_id: [u8; 32],
    payload: Binary,
    fee_data: Option<Binary>,
}

/// Execute handler for deposits carrying native funds (or none, for call resources).
pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_domain_id: u8,
    resource_id: Binary,
    payload: Binary,
    fee_data: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::SystemPaused);
    }

    validate_destination(deps.storage, &config, destination_domain_id)?;

    let resource_id = binary_to_bytes32(&resource_id)?;
    let handler = load_handler(deps.storage, &resource_id)?;
    let mismatch = || ContractError::AssetMismatch {
        resource_id: bytes32_to_hex(&resource_id),
    };

    let mut locked = None;
    match &handler {
        ResourceHandler::Unlock {
            asset: AssetInfo::Native { denom },
        } => {
            if info.funds.len() != 1 || &info.funds[0].denom != denom {
                return Err(mismatch());
            }
            let amount = info.funds[0].amount;
            check_payload_amount(&payload, amount)?;
            locked = Some((denom.clone(), amount));
        }
        ResourceHandler::Call { .. } => {
            if !info.funds.is_empty() {
                return Err(mismatch());
            }
        }
        _ => return Err(mismatch()),
    }

    if let Some((asset, amount)) = &locked {
        adjust_locked(deps.storage, asset, *amount, true)?;
    }

    let request = DepositRequest {
        depositor: info.sender,
        destination_domain_id,
        resource_id,
        payload,
        fee_data,
    };
    let event = record_deposit(deps, &env, &config, request)?;

    Ok(Response::new()
        .add_attribute("method", "deposit")
        .add_attribute("handler", handler.kind())
        .add_event(event))
}

/// Execute handler for CW20 deposits (called via CW20 send).
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::SystemPaused);
    }

    let token = info.sender;
    let amount = cw20_msg.amount;
    let depositor = deps.api.addr_validate(&cw20_msg.sender)?;

    let receive_msg: ReceiveMsg = from_json(&cw20_msg.msg)?;
    let (destination_domain_id, resource_id, payload, fee_data) = match receive_msg {
        ReceiveMsg::Deposit {
            destination_domain_id,
            resource_id,
            payload,
            fee_data,
        } => (destination_domain_id, resource_id, payload, fee_data),
    };

    validate_destination(deps.storage, &config, destination_domain_id)?;

    let resource_id = binary_to_bytes32(&resource_id)?;
    let handler = load_handler(deps.storage, &resource_id)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    match &handler {
        ResourceHandler::Mint { token: wrapped } if *wrapped == token => {
            check_payload_amount(&payload, amount)?;
            // Wrapped tokens leave circulation on this side.
            messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: token.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Burn { amount })?,
                funds: vec![],
            }));
        }
        ResourceHandler::Unlock {
            asset: AssetInfo::Cw20 { contract_addr },
        } if *contract_addr == token => {
            check_payload_amount(&payload, amount)?;
            adjust_locked(deps.storage, token.as_str(), amount, true)?;
        }
        _ => {
            return Err(ContractError::AssetMismatch {
                resource_id: bytes32_to_hex(&resource_id),
            })
        }
    }

    let request = DepositRequest {
        depositor,
        destination_domain_id,
        resource_id,
        payload,
        fee_data,
    };
    let event = record_deposit(deps, &env, &config, request)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "deposit_cw20")
        .add_attribute("handler", handler.kind())
        .add_attribute("token", token.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(event))
}

fn validate_destination(
    storage: &dyn Storage,
    config: &Config,
    destination_domain_id: u8,
) -> Result<(), ContractError> {
    // Deposits never loop back to this domain.
    if destination_domain_id == config.domain_id {
        return Err(ContractError::DomainNotSupported {
            domain_id: destination_domain_id,
        });
    }

    let domain = DOMAINS
        .may_load(storage, destination_domain_id)?
        .ok_or(ContractError::DomainNotSupported {
            domain_id: destination_domain_id,
        })?;

    if !domain.enabled {
        return Err(ContractError::DomainNotSupported {
            domain_id: destination_domain_id,
        });
    }
    Ok(())
}

fn load_handler(
    storage: &dyn Storage,
    resource_id: &[u8; 32],
) -> Result<ResourceHandler, ContractError> {
    RESOURCES
        .may_load(storage, resource_id)?
        .ok_or_else(|| ContractError::UnknownResource {
            resource_id: bytes32_to_hex(resource_id),
        })
}

/// The token payload must describe exactly what was attached.
fn check_payload_amount(payload: &[u8], attached: Uint128) -> Result<(), ContractError> {
    let transfer = TokenPayload::decode(payload)?;
    if transfer.amount.is_zero() {
        return Err(ContractError::InvalidPayload {
            reason: "zero amount".to_string(),
        });
    }
    if transfer.amount != attached {
        return Err(ContractError::AmountMismatch {
            expected: transfer.amount,
            got: attached,
        });
    }
    Ok(())
}

fn record_deposit(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    request: DepositRequest,
) -> Result<Event, ContractError> {
    let origin_domain_id = config.domain_id;
    let deposit_nonce = assign_nonce(deps.storage, origin_domain_id)?;
    let payload_hash = payload_hash(&request.payload);

    let record = DepositRecord {
        origin_domain_id,
        destination_domain_id: request.destination_domain_id,
        deposit_nonce,
        resource_id: request.resource_id,
        depositor: request.depositor,
        payload: request.payload,
        fee_data: request.fee_data.unwrap_or_default(),
        block_height: env.block.height,
    };
    DEPOSITS.save(deps.storage, (origin_domain_id, deposit_nonce), &record)?;

    Ok(Event::new("deposit")
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("destination_domain_id", record.destination_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("resource_id", bytes32_to_hex(&record.resource_id))
        .add_attribute("depositor", record.depositor.to_string())
        .add_attribute("payload_hash", bytes32_to_hex(&payload_hash)))
}
