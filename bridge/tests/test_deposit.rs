//! Integration tests for origin-side deposits and destination-side unlocks
//! backed by locked liquidity.

mod suite;

use cosmwasm_std::{coins, to_json_binary, Addr, Binary, Uint128};
use cw20::{Cw20ExecuteMsg, TokenInfoResponse};
use cw_multi_test::Executor;

use quorum_bridge::msg::{
    DepositResponse, ExecuteMsg, LockedBalanceResponse, NonceResponse, QueryMsg, ReceiveMsg,
};
use quorum_bridge::{compute_data_hash, keccak256, ProposalStatus, ResourceHandler};
use suite::{
    attr, has_event, root_error, token_payload, Suite, DENOM, LOCAL_DOMAIN, MINT_RESOURCE,
    REMOTE_DOMAIN, UNLOCK_RESOURCE,
};

fn locked_balance(suite: &Suite) -> Uint128 {
    let res: LockedBalanceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::LockedBalance {
                asset: DENOM.to_string(),
            },
        )
        .unwrap();
    res.amount
}

// ============================================================================
// Native Deposits
// ============================================================================

#[test]
fn test_deposit_nonces_are_contiguous() {
    let mut suite = Suite::new(3, 2);
    let remote_recipient = Addr::unchecked("remote1recipient");

    for expected in 1..=3u64 {
        let payload = token_payload(1_000, &remote_recipient);
        let res = suite.deposit_native(1_000, &payload).unwrap();
        assert!(has_event(&res, "deposit"));
        assert_eq!(attr(&res, "deposit_nonce").unwrap(), expected.to_string());
        assert_eq!(
            attr(&res, "origin_domain_id").unwrap(),
            LOCAL_DOMAIN.to_string()
        );
    }

    let nonce: NonceResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::DepositNonce {
                origin_domain_id: LOCAL_DOMAIN,
            },
        )
        .unwrap();
    assert_eq!(nonce.nonce, 3);
    assert_eq!(locked_balance(&suite), Uint128::new(3_000));
    assert_eq!(suite.native_balance(&suite.bridge), Uint128::new(3_000));
}

#[test]
fn test_deposit_record_stored() {
    let mut suite = Suite::new(3, 2);
    let user = suite.user.clone();
    let payload = token_payload(2_000, &Addr::unchecked("remote1recipient"));
    let fee_data = Binary::from(b"relayer-fee".to_vec());

    suite
        .app
        .execute_contract(
            user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::Deposit {
                destination_domain_id: REMOTE_DOMAIN,
                resource_id: Binary::from(UNLOCK_RESOURCE.to_vec()),
                payload: payload.clone(),
                fee_data: Some(fee_data.clone()),
            },
            &coins(2_000, DENOM),
        )
        .unwrap();

    let deposit: DepositResponse = suite
        .app
        .wrap()
        .query_wasm_smart(
            &suite.bridge,
            &QueryMsg::Deposit {
                origin_domain_id: LOCAL_DOMAIN,
                deposit_nonce: 1,
            },
        )
        .unwrap();

    assert_eq!(deposit.destination_domain_id, REMOTE_DOMAIN);
    assert_eq!(deposit.depositor, user);
    assert_eq!(deposit.resource_id, Binary::from(UNLOCK_RESOURCE.to_vec()));
    assert_eq!(deposit.payload_hash, Binary::from(keccak256(&payload).to_vec()));
    assert_eq!(deposit.payload, payload);
    assert_eq!(deposit.fee_data, fee_data);
}

#[test]
fn test_deposit_validation() {
    let mut suite = Suite::new(3, 2);
    let user = suite.user.clone();
    let remote_recipient = Addr::unchecked("remote1recipient");

    // Payload amount must match the attached funds
    let payload = token_payload(999, &remote_recipient);
    let err = root_error(suite.deposit_native(1_000, &payload));
    assert!(err.contains("Amount mismatch"), "{}", err);

    // Unlock resources need their coin attached
    let payload = token_payload(1_000, &remote_recipient);
    let err = root_error(suite.app.execute_contract(
        user.clone(),
        suite.bridge.clone(),
        &ExecuteMsg::Deposit {
            destination_domain_id: REMOTE_DOMAIN,
            resource_id: Binary::from(UNLOCK_RESOURCE.to_vec()),
            payload: payload.clone(),
            fee_data: None,
        },
        &[],
    ));
    assert!(err.contains("Asset does not match"), "{}", err);

    // Mint resources only accept their CW20
    let err = root_error(suite.app.execute_contract(
        user.clone(),
        suite.bridge.clone(),
        &ExecuteMsg::Deposit {
            destination_domain_id: REMOTE_DOMAIN,
            resource_id: Binary::from(MINT_RESOURCE.to_vec()),
            payload: payload.clone(),
            fee_data: None,
        },
        &coins(1_000, DENOM),
    ));
    assert!(err.contains("Asset does not match"), "{}", err);

    // Destination must be a registered remote domain
    for destination in [LOCAL_DOMAIN, 7u8] {
        let err = root_error(suite.app.execute_contract(
            user.clone(),
            suite.bridge.clone(),
            &ExecuteMsg::Deposit {
                destination_domain_id: destination,
                resource_id: Binary::from(UNLOCK_RESOURCE.to_vec()),
                payload: payload.clone(),
                fee_data: None,
            },
            &coins(1_000, DENOM),
        ));
        assert!(err.contains("Domain not supported"), "{}", err);
    }

    // Malformed resource id
    let err = root_error(suite.app.execute_contract(
        user,
        suite.bridge.clone(),
        &ExecuteMsg::Deposit {
            destination_domain_id: REMOTE_DOMAIN,
            resource_id: Binary::from(vec![1u8; 20]),
            payload,
            fee_data: None,
        },
        &coins(1_000, DENOM),
    ));
    assert!(err.contains("Invalid hash length"), "{}", err);

    assert_eq!(locked_balance(&suite), Uint128::zero());
}

#[test]
fn test_deposit_to_disabled_domain_rejected() {
    let mut suite = Suite::new(3, 2);
    let payload = token_payload(1_000, &Addr::unchecked("remote1recipient"));

    suite
        .admin_execute(&ExecuteMsg::UpdateDomain {
            domain_id: REMOTE_DOMAIN,
            enabled: false,
        })
        .unwrap();
    let err = root_error(suite.deposit_native(1_000, &payload));
    assert!(err.contains("Domain not supported"), "{}", err);

    suite
        .admin_execute(&ExecuteMsg::UpdateDomain {
            domain_id: REMOTE_DOMAIN,
            enabled: true,
        })
        .unwrap();
    suite.deposit_native(1_000, &payload).unwrap();
}

#[test]
fn test_deposit_blocked_while_paused() {
    let mut suite = Suite::new(3, 2);
    let payload = token_payload(1_000, &Addr::unchecked("remote1recipient"));

    suite.admin_execute(&ExecuteMsg::Pause {}).unwrap();
    let err = root_error(suite.deposit_native(1_000, &payload));
    assert!(err.contains("paused"), "{}", err);
}

#[test]
fn test_call_resource_deposit_takes_no_funds() {
    let mut suite = Suite::new(3, 2);
    let user = suite.user.clone();
    let target = suite.token.clone();
    let resource_id = [5u8; 32];
    suite
        .set_resource(resource_id, ResourceHandler::Call { contract: target })
        .unwrap();

    let payload = Binary::from(br#"{"remote_call":{}}"#.to_vec());
    let msg = ExecuteMsg::Deposit {
        destination_domain_id: REMOTE_DOMAIN,
        resource_id: Binary::from(resource_id.to_vec()),
        payload,
        fee_data: None,
    };

    let err = root_error(suite.app.execute_contract(
        user.clone(),
        suite.bridge.clone(),
        &msg,
        &coins(10, DENOM),
    ));
    assert!(err.contains("Asset does not match"), "{}", err);

    let res = suite.execute_as(&user, &msg).unwrap();
    assert_eq!(attr(&res, "handler").unwrap(), "call");
    assert_eq!(attr(&res, "deposit_nonce").unwrap(), "1");
}

// ============================================================================
// CW20 Deposits
// ============================================================================

#[test]
fn test_cw20_deposit_burns_wrapped_tokens() {
    let mut suite = Suite::new(3, 2);
    let user = suite.user.clone();
    let token = suite.token.clone();
    let bridge = suite.bridge.clone();
    let payload = token_payload(400, &Addr::unchecked("remote1recipient"));

    let res = suite
        .app
        .execute_contract(
            user.clone(),
            token.clone(),
            &Cw20ExecuteMsg::Send {
                contract: bridge.to_string(),
                amount: Uint128::new(400),
                msg: to_json_binary(&ReceiveMsg::Deposit {
                    destination_domain_id: REMOTE_DOMAIN,
                    resource_id: Binary::from(MINT_RESOURCE.to_vec()),
                    payload,
                    fee_data: None,
                })
                .unwrap(),
            },
            &[],
        )
        .unwrap();
    assert!(has_event(&res, "deposit"));
    assert_eq!(attr(&res, "handler").unwrap(), "mint");

    assert_eq!(suite.token_balance(&token, &user), Uint128::new(999_600));
    assert_eq!(suite.token_balance(&token, &bridge), Uint128::zero());

    let info: TokenInfoResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&token, &cw20::Cw20QueryMsg::TokenInfo {})
        .unwrap();
    assert_eq!(info.total_supply, Uint128::new(999_600));
}

#[test]
fn test_cw20_deposit_to_native_resource_rejected() {
    let mut suite = Suite::new(3, 2);
    let user = suite.user.clone();
    let token = suite.token.clone();
    let bridge = suite.bridge.clone();
    let payload = token_payload(400, &Addr::unchecked("remote1recipient"));

    let err = root_error(suite.app.execute_contract(
        user,
        token,
        &Cw20ExecuteMsg::Send {
            contract: bridge.to_string(),
            amount: Uint128::new(400),
            msg: to_json_binary(&ReceiveMsg::Deposit {
                destination_domain_id: REMOTE_DOMAIN,
                resource_id: Binary::from(UNLOCK_RESOURCE.to_vec()),
                payload,
                fee_data: None,
            })
            .unwrap(),
        },
        &[],
    ));
    assert!(err.contains("Asset does not match"), "{}", err);
}

// ============================================================================
// Unlocks Against Locked Liquidity
// ============================================================================

#[test]
fn test_unlock_waits_for_liquidity() {
    let mut suite = Suite::new(3, 2);
    let recipient = Addr::unchecked("terra1recipient");
    let origin_side = Addr::unchecked("remote1recipient");

    suite
        .deposit_native(1_000, &token_payload(1_000, &origin_side))
        .unwrap();

    let payload = token_payload(1_500, &recipient);
    let data_hash = compute_data_hash(DENOM, &payload);

    suite.vote(0, 1, UNLOCK_RESOURCE, &payload).unwrap();
    let res = suite.vote(1, 1, UNLOCK_RESOURCE, &payload).unwrap();
    assert!(has_event(&res, "effect_failed"));
    assert!(attr(&res, "reason").unwrap().contains("insufficient liquidity"));
    assert_eq!(suite.proposal(1, data_hash).status, ProposalStatus::Passed);
    assert_eq!(locked_balance(&suite), Uint128::new(1_000));

    suite
        .deposit_native(1_000, &token_payload(1_000, &origin_side))
        .unwrap();

    suite
        .execute_proposal(1, UNLOCK_RESOURCE, &payload)
        .unwrap();
    assert_eq!(suite.proposal(1, data_hash).status, ProposalStatus::Executed);
    assert_eq!(suite.native_balance(&recipient), Uint128::new(1_500));
    assert_eq!(locked_balance(&suite), Uint128::new(500));
    assert_eq!(suite.native_balance(&suite.bridge), Uint128::new(500));
}

#[test]
fn test_unlock_by_vote_releases_locked_balance() {
    let mut suite = Suite::new(3, 2);
    let recipient = Addr::unchecked("terra1recipient");

    suite
        .deposit_native(5_000, &token_payload(5_000, &Addr::unchecked("remote1recipient")))
        .unwrap();

    let payload = token_payload(2_000, &recipient);
    suite.vote(0, 1, UNLOCK_RESOURCE, &payload).unwrap();
    let res = suite.vote(2, 1, UNLOCK_RESOURCE, &payload).unwrap();
    assert!(has_event(&res, "effect_executed"));

    assert_eq!(suite.native_balance(&recipient), Uint128::new(2_000));
    assert_eq!(locked_balance(&suite), Uint128::new(3_000));
}
