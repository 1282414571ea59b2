//! Quorum voting handlers.
//!
//! - `Vote` - Relayer votes on the proposal for a deposit; the threshold vote dispatches
//! - `Cancel` - Anyone cancels an expired active proposal
//! - `ExecuteProposal` - Anyone re-dispatches a passed proposal whose effect failed

use cosmwasm_std::{Binary, DepsMut, Env, Event, MessageInfo, Response};

use crate::error::ContractError;
use crate::execute::dispatch::{
    commit_dispatch, plan_dispatch, planning_failed_event, DispatchTarget,
};
use crate::hash::{binary_to_bytes32, bytes32_to_hex, compute_data_hash};
use crate::proposal::{self, Proposal, VoteOutcome};
use crate::state::{DispatchSource, CONFIG, RELAYERS, RESOURCES};

/// Execute handler for a relayer vote.
pub fn execute_vote(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: u8,
    deposit_nonce: u64,
    resource_id: Binary,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::SystemPaused);
    }

    let relayer_index = RELAYERS
        .may_load(deps.storage, &info.sender)?
        .ok_or(ContractError::NotRelayer)?;

    let resource_id = binary_to_bytes32(&resource_id)?;
    let handler = RESOURCES
        .may_load(deps.storage, &resource_id)?
        .ok_or_else(|| ContractError::UnknownResource {
            resource_id: bytes32_to_hex(&resource_id),
        })?;
    let data_hash = compute_data_hash(&handler.address(), &payload);

    let height = env.block.height;
    let (mut proposal, created) = proposal::get_or_create(
        deps.storage,
        origin_domain_id,
        deposit_nonce,
        &data_hash,
        height,
    )?;

    let mut response = Response::new()
        .add_attribute("method", "vote")
        .add_attribute("relayer", info.sender.to_string())
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(&data_hash));

    if created {
        response = response.add_event(
            proposal_event("proposal_created", origin_domain_id, deposit_nonce, &data_hash)
                .add_attribute("resource_id", bytes32_to_hex(&resource_id))
                .add_attribute("proposed_block", height.to_string()),
        );
    }

    let outcome = proposal.vote(
        relayer_index,
        height,
        config.expiry,
        config.relayer_threshold,
    )?;

    match outcome {
        VoteOutcome::DuplicateIgnored => {
            return Ok(response.add_attribute("outcome", "duplicate_vote_ignored"));
        }
        VoteOutcome::Expired => {
            proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;
            return Ok(response
                .add_attribute("outcome", "proposal_expired")
                .add_event(
                    proposal_event(
                        "proposal_cancelled",
                        origin_domain_id,
                        deposit_nonce,
                        &data_hash,
                    )
                    .add_attribute("reason", "expired"),
                ));
        }
        VoteOutcome::Counted | VoteOutcome::Passed => {}
    }

    response = response.add_event(
        proposal_event("vote_cast", origin_domain_id, deposit_nonce, &data_hash)
            .add_attribute("relayer", info.sender.to_string())
            .add_attribute("yes_votes_total", proposal.yes_votes_total.to_string()),
    );

    if outcome == VoteOutcome::Counted {
        proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;
        return Ok(response.add_attribute("outcome", "vote_counted"));
    }

    response = response
        .add_attribute("outcome", "proposal_passed")
        .add_event(proposal_event(
            "proposal_passed",
            origin_domain_id,
            deposit_nonce,
            &data_hash,
        ));

    let target = DispatchTarget {
        origin_domain_id,
        destination_domain_id: config.domain_id,
        deposit_nonce,
        resource_id,
        payload,
    };

    // A failed effect must not undo the tally: the proposal stays Passed.
    match plan_dispatch(deps.as_ref(), target) {
        Ok(plan) => {
            proposal.mark_executed()?;
            proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;
            let sub_msg = commit_dispatch(deps.storage, &env, plan, DispatchSource::Vote)?;
            Ok(response.add_submessage(sub_msg))
        }
        Err(err) => {
            proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;
            Ok(response.add_event(planning_failed_event(
                origin_domain_id,
                deposit_nonce,
                &data_hash,
                &err,
            )))
        }
    }
}

/// Execute handler for cancelling an expired proposal (anyone).
pub fn execute_cancel(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let data_hash = binary_to_bytes32(&data_hash)?;

    let mut proposal = proposal::get(deps.storage, origin_domain_id, deposit_nonce, &data_hash)?
        .ok_or(ContractError::CannotCancel)?;

    proposal.cancel(env.block.height, config.expiry)?;
    proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;

    Ok(Response::new()
        .add_attribute("method", "cancel")
        .add_attribute("cancelled_by", info.sender.to_string())
        .add_event(
            proposal_event("proposal_cancelled", origin_domain_id, deposit_nonce, &data_hash)
                .add_attribute("reason", "cancelled"),
        ))
}

/// Execute handler for re-dispatching a passed proposal (anyone).
pub fn execute_execute_proposal(
    deps: DepsMut,
    env: Env,
    origin_domain_id: u8,
    deposit_nonce: u64,
    resource_id: Binary,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::SystemPaused);
    }

    let resource_id = binary_to_bytes32(&resource_id)?;
    let handler = RESOURCES
        .may_load(deps.storage, &resource_id)?
        .ok_or_else(|| ContractError::UnknownResource {
            resource_id: bytes32_to_hex(&resource_id),
        })?;
    let data_hash = compute_data_hash(&handler.address(), &payload);

    let mut proposal: Proposal =
        proposal::get(deps.storage, origin_domain_id, deposit_nonce, &data_hash)?
            .ok_or(ContractError::ProposalNotFound)?;

    if proposal.status == proposal::ProposalStatus::Executed {
        return Err(ContractError::AlreadyExecuted {
            origin_domain_id,
            deposit_nonce,
        });
    }
    proposal.mark_executed()?;

    let plan = plan_dispatch(
        deps.as_ref(),
        DispatchTarget {
            origin_domain_id,
            destination_domain_id: config.domain_id,
            deposit_nonce,
            resource_id,
            payload,
        },
    )?;

    proposal::save(deps.storage, origin_domain_id, deposit_nonce, &data_hash, &proposal)?;
    let sub_msg = commit_dispatch(deps.storage, &env, plan, DispatchSource::Recovery)?;

    Ok(Response::new()
        .add_submessage(sub_msg)
        .add_attribute("method", "execute_proposal")
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(&data_hash)))
}

fn proposal_event(
    kind: &str,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: &[u8; 32],
) -> Event {
    Event::new(kind)
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(data_hash))
}
