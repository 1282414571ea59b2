//! Signature-authorized execution.
//!
//! A single attestation from the configured authority replaces the relayer
//! vote tally. Proposals are never read or written on this path; the only
//! shared state is the execution record.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response};

use crate::error::ContractError;
use crate::execute::dispatch::{commit_dispatch, plan_dispatch, DispatchTarget};
use crate::hash::{binary_to_bytes32, bytes32_to_hex, compute_signature_message};
use crate::signature::recover_signer;
use crate::state::{DispatchSource, CONFIG};

/// Execute handler for an authority-signed deposit.
#[allow(clippy::too_many_arguments)]
pub fn execute_execute_with_signature(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_domain_id: u8,
    destination_domain_id: u8,
    deposit_nonce: u64,
    payload: Binary,
    resource_id: Binary,
    signature: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::SystemPaused);
    }
    let authority = config.authority.ok_or(ContractError::SystemPaused)?;

    if destination_domain_id != config.domain_id {
        return Err(ContractError::InvalidDestination {
            expected: config.domain_id,
            got: destination_domain_id,
        });
    }

    let resource_id = binary_to_bytes32(&resource_id)?;
    let message_hash = compute_signature_message(
        origin_domain_id,
        destination_domain_id,
        deposit_nonce,
        &payload,
        &resource_id,
    );

    let signer = recover_signer(deps.api, &message_hash, &signature)?;
    if signer != authority {
        return Err(ContractError::InvalidSignature);
    }

    let plan = plan_dispatch(
        deps.as_ref(),
        DispatchTarget {
            origin_domain_id,
            destination_domain_id,
            deposit_nonce,
            resource_id,
            payload,
        },
    )?;
    let data_hash = plan.data_hash;
    let sub_msg = commit_dispatch(deps.storage, &env, plan, DispatchSource::Signature)?;

    Ok(Response::new()
        .add_submessage(sub_msg)
        .add_attribute("method", "execute_with_signature")
        .add_attribute("submitter", info.sender.to_string())
        .add_attribute("origin_domain_id", origin_domain_id.to_string())
        .add_attribute("deposit_nonce", deposit_nonce.to_string())
        .add_attribute("data_hash", bytes32_to_hex(&data_hash))
        .add_attribute("message_hash", bytes32_to_hex(&message_hash)))
}
