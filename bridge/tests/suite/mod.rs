//! Shared cw-multi-test harness for the bridge integration tests.

#![allow(dead_code)]

use common::AssetInfo;
use cosmwasm_std::{coins, Addr, Binary, Coin, Empty, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use k256::ecdsa::SigningKey;

use quorum_bridge::msg::{ExecuteMsg, InstantiateMsg, ProposalResponse, QueryMsg};
use quorum_bridge::{compute_data_hash, keccak256, ResourceHandler, TokenPayload};

pub const LOCAL_DOMAIN: u8 = 1;
pub const REMOTE_DOMAIN: u8 = 2;
pub const EXPIRY: u64 = 10;
pub const DENOM: &str = "uluna";

pub const MINT_RESOURCE: [u8; 32] = [1u8; 32];
pub const UNLOCK_RESOURCE: [u8; 32] = [2u8; 32];

pub fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        quorum_bridge::contract::execute,
        quorum_bridge::contract::instantiate,
        quorum_bridge::contract::query,
    )
    .with_reply(quorum_bridge::contract::reply);
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub fn token_payload(amount: u128, recipient: &Addr) -> Binary {
    TokenPayload {
        amount: Uint128::new(amount),
        recipient: recipient.to_string(),
    }
    .encode()
}

/// Whether the response carries a contract event of `kind`.
pub fn has_event(res: &AppResponse, kind: &str) -> bool {
    let ty = format!("wasm-{}", kind);
    res.events.iter().any(|e| e.ty == ty)
}

pub fn attr(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}

pub fn root_error(res: anyhow::Result<AppResponse>) -> String {
    res.unwrap_err().root_cause().to_string()
}

pub struct Suite {
    pub app: App,
    pub admin: Addr,
    pub user: Addr,
    pub relayers: Vec<Addr>,
    pub bridge: Addr,
    pub token: Addr,
    pub cw20_code_id: u64,
}

impl Suite {
    pub fn new(relayer_count: usize, threshold: u32) -> Self {
        let mut app = App::default();

        let admin = Addr::unchecked("terra1admin");
        let user = Addr::unchecked("terra1user");
        let relayers: Vec<Addr> = (0..relayer_count)
            .map(|i| Addr::unchecked(format!("terra1relayer{}", i)))
            .collect();

        app.init_modules(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &user, coins(10_000_000_000, DENOM))
                .unwrap();
            router
                .bank
                .init_balance(storage, &admin, coins(10_000_000_000, DENOM))
                .unwrap();
        });

        let bridge_code_id = app.store_code(contract_bridge());
        let cw20_code_id = app.store_code(contract_cw20());

        let bridge = app
            .instantiate_contract(
                bridge_code_id,
                admin.clone(),
                &InstantiateMsg {
                    admin: admin.to_string(),
                    domain_id: LOCAL_DOMAIN,
                    relayers: relayers.iter().map(|r| r.to_string()).collect(),
                    relayer_threshold: threshold,
                    expiry: EXPIRY,
                    authority: None,
                },
                &[],
                "quorum-bridge",
                None,
            )
            .unwrap();

        let token = app
            .instantiate_contract(
                cw20_code_id,
                admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Wrapped Token".to_string(),
                    symbol: "WTKN".to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: user.to_string(),
                        amount: Uint128::from(1_000_000u128),
                    }],
                    mint: Some(MinterResponse {
                        minter: bridge.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                "cw20-wrapped",
                None,
            )
            .unwrap();

        let mut suite = Suite {
            app,
            admin,
            user,
            relayers,
            bridge,
            token,
            cw20_code_id,
        };

        suite
            .admin_execute(&ExecuteMsg::RegisterDomain {
                domain_id: REMOTE_DOMAIN,
                name: "remote".to_string(),
            })
            .unwrap();
        suite
            .set_resource(
                MINT_RESOURCE,
                ResourceHandler::Mint {
                    token: suite.token.clone(),
                },
            )
            .unwrap();
        suite
            .set_resource(
                UNLOCK_RESOURCE,
                ResourceHandler::Unlock {
                    asset: AssetInfo::Native {
                        denom: DENOM.to_string(),
                    },
                },
            )
            .unwrap();

        suite
    }

    pub fn admin_execute(&mut self, msg: &ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(self.admin.clone(), self.bridge.clone(), msg, &[])
    }

    pub fn execute_as(&mut self, sender: &Addr, msg: &ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(sender.clone(), self.bridge.clone(), msg, &[])
    }

    pub fn set_resource(
        &mut self,
        resource_id: [u8; 32],
        handler: ResourceHandler,
    ) -> anyhow::Result<AppResponse> {
        self.admin_execute(&ExecuteMsg::SetResource {
            resource_id: Binary::from(resource_id.to_vec()),
            handler,
        })
    }

    /// Instantiate another CW20 whose minter is `minter`.
    pub fn new_token(&mut self, symbol: &str, minter: &Addr) -> Addr {
        self.app
            .instantiate_contract(
                self.cw20_code_id,
                self.admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: format!("{} Token", symbol),
                    symbol: symbol.to_string(),
                    decimals: 6,
                    initial_balances: vec![],
                    mint: Some(MinterResponse {
                        minter: minter.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                format!("cw20-{}", symbol.to_lowercase()),
                None,
            )
            .unwrap()
    }

    pub fn vote(
        &mut self,
        relayer: usize,
        deposit_nonce: u64,
        resource_id: [u8; 32],
        payload: &Binary,
    ) -> anyhow::Result<AppResponse> {
        let sender = self.relayers[relayer].clone();
        self.execute_as(
            &sender,
            &ExecuteMsg::Vote {
                origin_domain_id: REMOTE_DOMAIN,
                deposit_nonce,
                resource_id: Binary::from(resource_id.to_vec()),
                payload: payload.clone(),
            },
        )
    }

    pub fn cancel(
        &mut self,
        sender: &Addr,
        deposit_nonce: u64,
        data_hash: [u8; 32],
    ) -> anyhow::Result<AppResponse> {
        self.execute_as(
            sender,
            &ExecuteMsg::Cancel {
                origin_domain_id: REMOTE_DOMAIN,
                deposit_nonce,
                data_hash: Binary::from(data_hash.to_vec()),
            },
        )
    }

    pub fn execute_proposal(
        &mut self,
        deposit_nonce: u64,
        resource_id: [u8; 32],
        payload: &Binary,
    ) -> anyhow::Result<AppResponse> {
        let sender = self.user.clone();
        self.execute_as(
            &sender,
            &ExecuteMsg::ExecuteProposal {
                origin_domain_id: REMOTE_DOMAIN,
                deposit_nonce,
                resource_id: Binary::from(resource_id.to_vec()),
                payload: payload.clone(),
            },
        )
    }

    pub fn deposit_native(
        &mut self,
        amount: u128,
        payload: &Binary,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.user.clone(),
            self.bridge.clone(),
            &ExecuteMsg::Deposit {
                destination_domain_id: REMOTE_DOMAIN,
                resource_id: Binary::from(UNLOCK_RESOURCE.to_vec()),
                payload: payload.clone(),
                fee_data: None,
            },
            &[Coin::new(amount, DENOM)],
        )
    }

    pub fn advance_blocks(&mut self, blocks: u64) {
        self.app.update_block(|block| {
            block.height += blocks;
            block.time = block.time.plus_seconds(blocks * 6);
        });
    }

    pub fn height(&self) -> u64 {
        self.app.block_info().height
    }

    pub fn mint_data_hash(&self, payload: &Binary) -> [u8; 32] {
        compute_data_hash(self.token.as_str(), payload)
    }

    pub fn proposal(&self, deposit_nonce: u64, data_hash: [u8; 32]) -> ProposalResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.bridge,
                &QueryMsg::Proposal {
                    origin_domain_id: REMOTE_DOMAIN,
                    deposit_nonce,
                    data_hash: Binary::from(data_hash.to_vec()),
                },
            )
            .unwrap()
    }

    pub fn is_executed(&self, deposit_nonce: u64) -> bool {
        let res: quorum_bridge::msg::IsExecutedResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.bridge,
                &QueryMsg::IsExecuted {
                    origin_domain_id: REMOTE_DOMAIN,
                    deposit_nonce,
                },
            )
            .unwrap();
        res.executed
    }

    pub fn token_balance(&self, token: &Addr, address: &Addr) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    pub fn native_balance(&self, address: &Addr) -> Uint128 {
        self.app
            .wrap()
            .query_balance(address, DENOM)
            .unwrap()
            .amount
    }
}

// ============================================================================
// Authority signing
// ============================================================================

pub fn authority_key() -> SigningKey {
    SigningKey::from_slice(&[7u8; 32]).unwrap()
}

/// 20-byte address of `key`, hex encoded with 0x prefix.
pub fn authority_address(key: &SigningKey) -> String {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Sign `message_hash`, with v as 27/28 when `ethereum_v` is set, else 0/1.
pub fn sign(key: &SigningKey, message_hash: &[u8; 32], ethereum_v: bool) -> Binary {
    let (signature, recovery_id) = key.sign_prehash_recoverable(message_hash).unwrap();
    let mut bytes = signature.to_bytes().to_vec();
    let v = recovery_id.to_byte();
    bytes.push(if ethereum_v { v + 27 } else { v });
    Binary::from(bytes)
}
