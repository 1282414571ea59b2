//! Quorum Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//!
//! Handler effects run as sub-messages; their outcome arrives at [`reply`].

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_add_relayer, execute_cancel, execute_deposit, execute_execute_proposal,
    execute_execute_with_signature, execute_pause, execute_receive, execute_register_domain,
    execute_remove_relayer, execute_remove_resource, execute_set_authority, execute_set_resource,
    execute_unpause, execute_update_domain, execute_update_expiry,
    execute_update_relayer_threshold, execute_vote, handle_effect_reply, register_relayer,
    validate_threshold,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_data_hash, query_deposit, query_deposit_nonce, query_domain,
    query_domains, query_execution_record, query_has_voted, query_is_executed,
    query_locked_balance, query_proposal, query_relayers, query_resource, query_resources,
    query_signature_message,
};
use crate::signature::parse_authority;
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, NEXT_RELAYER_INDEX, RELAYERS, RELAYER_COUNT,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;

    if msg.domain_id == 0 {
        return Err(ContractError::InvalidDomainId {
            domain_id: msg.domain_id,
        });
    }
    if msg.expiry == 0 {
        return Err(ContractError::InvalidExpiry);
    }

    let authority = msg
        .authority
        .as_deref()
        .map(parse_authority)
        .transpose()?;

    // Initialize relayers in the order given; indices start at 0
    RELAYER_COUNT.save(deps.storage, &0u32)?;
    NEXT_RELAYER_INDEX.save(deps.storage, &0u16)?;
    for relayer in &msg.relayers {
        let relayer = deps.api.addr_validate(relayer)?;
        if RELAYERS.has(deps.storage, &relayer) {
            return Err(ContractError::RelayerAlreadyRegistered);
        }
        register_relayer(deps.storage, &relayer)?;
    }
    let relayer_count = RELAYER_COUNT.load(deps.storage)?;
    validate_threshold(msg.relayer_threshold, relayer_count)?;

    let config = Config {
        admin,
        paused: false,
        domain_id: msg.domain_id,
        relayer_threshold: msg.relayer_threshold,
        expiry: msg.expiry,
        authority,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("domain_id", config.domain_id.to_string())
        .add_attribute("relayer_count", relayer_count.to_string())
        .add_attribute("relayer_threshold", config.relayer_threshold.to_string())
        .add_attribute("expiry", config.expiry.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Origin side
        ExecuteMsg::Deposit {
            destination_domain_id,
            resource_id,
            payload,
            fee_data,
        } => execute_deposit(
            deps,
            env,
            info,
            destination_domain_id,
            resource_id,
            payload,
            fee_data,
        ),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),

        // Destination side
        ExecuteMsg::Vote {
            origin_domain_id,
            deposit_nonce,
            resource_id,
            payload,
        } => execute_vote(
            deps,
            env,
            info,
            origin_domain_id,
            deposit_nonce,
            resource_id,
            payload,
        ),
        ExecuteMsg::Cancel {
            origin_domain_id,
            deposit_nonce,
            data_hash,
        } => execute_cancel(deps, env, info, origin_domain_id, deposit_nonce, data_hash),
        ExecuteMsg::ExecuteProposal {
            origin_domain_id,
            deposit_nonce,
            resource_id,
            payload,
        } => execute_execute_proposal(
            deps,
            env,
            origin_domain_id,
            deposit_nonce,
            resource_id,
            payload,
        ),
        ExecuteMsg::ExecuteWithSignature {
            origin_domain_id,
            destination_domain_id,
            deposit_nonce,
            payload,
            resource_id,
            signature,
        } => execute_execute_with_signature(
            deps,
            env,
            info,
            origin_domain_id,
            destination_domain_id,
            deposit_nonce,
            payload,
            resource_id,
            signature,
        ),

        // Relayer set
        ExecuteMsg::AddRelayer { relayer } => execute_add_relayer(deps, info, relayer),
        ExecuteMsg::RemoveRelayer { relayer } => execute_remove_relayer(deps, info, relayer),
        ExecuteMsg::UpdateRelayerThreshold { threshold } => {
            execute_update_relayer_threshold(deps, info, threshold)
        }
        ExecuteMsg::UpdateExpiry { expiry } => execute_update_expiry(deps, info, expiry),

        // Registries
        ExecuteMsg::SetResource {
            resource_id,
            handler,
        } => execute_set_resource(deps, info, resource_id, handler),
        ExecuteMsg::RemoveResource { resource_id } => {
            execute_remove_resource(deps, info, resource_id)
        }
        ExecuteMsg::RegisterDomain { domain_id, name } => {
            execute_register_domain(deps, info, domain_id, name)
        }
        ExecuteMsg::UpdateDomain { domain_id, enabled } => {
            execute_update_domain(deps, info, domain_id, enabled)
        }

        // Admin operations
        ExecuteMsg::SetAuthority { authority } => execute_set_authority(deps, info, authority),
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    handle_effect_reply(deps, msg)
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Relayers {} => to_json_binary(&query_relayers(deps)?),

        // Execution & proposal queries
        QueryMsg::IsExecuted {
            origin_domain_id,
            deposit_nonce,
        } => to_json_binary(&query_is_executed(deps, origin_domain_id, deposit_nonce)?),
        QueryMsg::ExecutionRecord {
            origin_domain_id,
            deposit_nonce,
        } => to_json_binary(&query_execution_record(
            deps,
            origin_domain_id,
            deposit_nonce,
        )?),
        QueryMsg::Proposal {
            origin_domain_id,
            deposit_nonce,
            data_hash,
        } => to_json_binary(&query_proposal(
            deps,
            env,
            origin_domain_id,
            deposit_nonce,
            data_hash,
        )?),
        QueryMsg::HasVoted {
            origin_domain_id,
            deposit_nonce,
            data_hash,
            relayer,
        } => to_json_binary(&query_has_voted(
            deps,
            origin_domain_id,
            deposit_nonce,
            data_hash,
            relayer,
        )?),

        // Registry queries
        QueryMsg::Resource { resource_id } => to_json_binary(&query_resource(deps, resource_id)?),
        QueryMsg::Resources { start_after, limit } => {
            to_json_binary(&query_resources(deps, start_after, limit)?)
        }
        QueryMsg::Domain { domain_id } => to_json_binary(&query_domain(deps, domain_id)?),
        QueryMsg::Domains { start_after, limit } => {
            to_json_binary(&query_domains(deps, start_after, limit)?)
        }

        // Deposit queries
        QueryMsg::DepositNonce { origin_domain_id } => {
            to_json_binary(&query_deposit_nonce(deps, origin_domain_id)?)
        }
        QueryMsg::Deposit {
            origin_domain_id,
            deposit_nonce,
        } => to_json_binary(&query_deposit(deps, origin_domain_id, deposit_nonce)?),
        QueryMsg::LockedBalance { asset } => to_json_binary(&query_locked_balance(deps, asset)?),

        // Hash computation queries
        QueryMsg::DataHash {
            resource_id,
            payload,
        } => to_json_binary(&query_data_hash(deps, resource_id, payload)?),
        QueryMsg::SignatureMessage {
            origin_domain_id,
            destination_domain_id,
            deposit_nonce,
            payload,
            resource_id,
        } => to_json_binary(&query_signature_message(
            origin_domain_id,
            destination_domain_id,
            deposit_nonce,
            payload,
            resource_id,
        )?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
