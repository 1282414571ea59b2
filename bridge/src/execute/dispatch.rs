//! Execution dispatcher shared by the vote, recovery and signature paths.
//!
//! Dispatch is split in two so the vote path can absorb a failed effect:
//! - [`plan_dispatch`] reads state and builds the effect, writing nothing
//! - [`commit_dispatch`] sets the execution record and emits the sub-message
//!
//! The effect runs as a `reply_always` sub-message under its own reply id, so
//! an effect that calls back into the bridge cannot disturb the outer dispatch.
//! On failure the reply removes the execution record; for votes the proposal
//! returns to `Passed`, for the other paths the whole call fails with
//! `EffectFailed`.

use cosmwasm_std::{
    Binary, Deps, DepsMut, Env, Event, Reply, Response, StdResult, Storage, SubMsg, SubMsgResult,
    Uint128,
};

use crate::error::ContractError;
use crate::handler::Effect;
use crate::hash::{bytes32_to_hex, compute_data_hash, payload_hash};
use crate::proposal;
use crate::state::{
    next_reply_id, DispatchSource, ExecutionRecord, PendingDispatch, EXECUTED, LOCKED_BALANCES,
    PENDING_DISPATCHES, RESOURCES,
};

/// Deposit whose effect is to be dispatched on this domain.
#[derive(Debug, Clone)]
pub struct DispatchTarget {
    pub origin_domain_id: u8,
    pub destination_domain_id: u8,
    pub deposit_nonce: u64,
    pub resource_id: [u8; 32],
    pub payload: Binary,
}

/// Validated effect ready to be committed.
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    pub target: DispatchTarget,
    pub data_hash: [u8; 32],
    pub payload_hash: [u8; 32],
    pub effect: Effect,
}

pub fn plan_dispatch(deps: Deps, target: DispatchTarget) -> Result<DispatchPlan, ContractError> {
    if EXECUTED.has(deps.storage, (target.origin_domain_id, target.deposit_nonce)) {
        return Err(ContractError::AlreadyExecuted {
            origin_domain_id: target.origin_domain_id,
            deposit_nonce: target.deposit_nonce,
        });
    }

    let handler = RESOURCES
        .may_load(deps.storage, &target.resource_id)?
        .ok_or_else(|| ContractError::UnknownResource {
            resource_id: bytes32_to_hex(&target.resource_id),
        })?;

    let effect = handler.apply_effect(deps.api, &target.payload)?;

    if let Some((asset, amount)) = &effect.released {
        let locked = LOCKED_BALANCES
            .may_load(deps.storage, asset.clone())?
            .unwrap_or_default();
        if locked < *amount {
            return Err(ContractError::EffectFailed {
                reason: format!("insufficient liquidity: {} locked, {} requested", locked, amount),
            });
        }
    }

    Ok(DispatchPlan {
        data_hash: compute_data_hash(&handler.address(), &target.payload),
        payload_hash: payload_hash(&target.payload),
        target,
        effect,
    })
}

pub fn commit_dispatch(
    storage: &mut dyn Storage,
    env: &Env,
    plan: DispatchPlan,
    source: DispatchSource,
) -> StdResult<SubMsg> {
    let target = &plan.target;

    EXECUTED.save(
        storage,
        (target.origin_domain_id, target.deposit_nonce),
        &ExecutionRecord {
            data_hash: plan.data_hash,
            payload_hash: plan.payload_hash,
            resource_id: target.resource_id,
            executed_at: env.block.height,
        },
    )?;

    if let Some((asset, amount)) = &plan.effect.released {
        adjust_locked(storage, asset, *amount, false)?;
    }

    let reply_id = next_reply_id(storage)?;
    PENDING_DISPATCHES.save(
        storage,
        reply_id,
        &PendingDispatch {
            source,
            origin_domain_id: target.origin_domain_id,
            destination_domain_id: target.destination_domain_id,
            deposit_nonce: target.deposit_nonce,
            data_hash: plan.data_hash,
            payload_hash: plan.payload_hash,
            released: plan.effect.released.clone(),
        },
    )?;

    Ok(SubMsg::reply_always(plan.effect.msg, reply_id))
}

/// Reply handler for dispatched effects.
pub fn handle_effect_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let pending = PENDING_DISPATCHES
        .may_load(deps.storage, msg.id)?
        .ok_or(ContractError::UnknownReplyId { id: msg.id })?;
    PENDING_DISPATCHES.remove(deps.storage, msg.id);

    match msg.result {
        SubMsgResult::Ok(_) => Ok(Response::new().add_event(
            effect_event("effect_executed", &pending)
                .add_attribute("destination_domain_id", pending.destination_domain_id.to_string()),
        )),
        SubMsgResult::Err(reason) => {
            deps.api.debug(&format!(
                "quorum-bridge: effect failed for origin {} nonce {}: {}",
                pending.origin_domain_id, pending.deposit_nonce, reason
            ));

            match pending.source {
                DispatchSource::Vote => {
                    rollback_dispatch(deps.storage, &pending)?;
                    Ok(Response::new().add_event(
                        effect_event("effect_failed", &pending).add_attribute("reason", reason),
                    ))
                }
                DispatchSource::Recovery | DispatchSource::Signature => {
                    Err(ContractError::EffectFailed { reason })
                }
            }
        }
    }
}

/// Undo a committed dispatch whose effect failed on the vote path.
fn rollback_dispatch(storage: &mut dyn Storage, pending: &PendingDispatch) -> StdResult<()> {
    EXECUTED.remove(storage, (pending.origin_domain_id, pending.deposit_nonce));

    if let Some((asset, amount)) = &pending.released {
        adjust_locked(storage, asset, *amount, true)?;
    }

    if let Some(mut proposal) = proposal::get(
        storage,
        pending.origin_domain_id,
        pending.deposit_nonce,
        &pending.data_hash,
    )? {
        proposal.revert_execution();
        proposal::save(
            storage,
            pending.origin_domain_id,
            pending.deposit_nonce,
            &pending.data_hash,
            &proposal,
        )?;
    }
    Ok(())
}

pub fn adjust_locked(
    storage: &mut dyn Storage,
    asset: &str,
    amount: Uint128,
    increase: bool,
) -> StdResult<()> {
    let current = LOCKED_BALANCES
        .may_load(storage, asset.to_string())?
        .unwrap_or_default();
    let updated = if increase {
        current.checked_add(amount)?
    } else {
        current.checked_sub(amount)?
    };
    LOCKED_BALANCES.save(storage, asset.to_string(), &updated)
}

fn effect_event(kind: &str, pending: &PendingDispatch) -> Event {
    Event::new(kind)
        .add_attribute("origin_domain_id", pending.origin_domain_id.to_string())
        .add_attribute("deposit_nonce", pending.deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(&pending.data_hash))
        .add_attribute("payload_hash", bytes32_to_hex(&pending.payload_hash))
}

/// Event for an effect that could not be planned on the vote path.
pub fn planning_failed_event(
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: &[u8; 32],
    reason: &ContractError,
) -> Event {
    Event::new("effect_failed")
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(data_hash))
        .add_attribute("reason", reason.to_string())
}
