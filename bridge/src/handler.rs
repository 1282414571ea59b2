//! Resource handlers: the destination-side effect of a deposit.
//!
//! Each registered resource id maps to one handler variant. Token handlers
//! read a [`TokenPayload`]; the call handler forwards the payload verbatim.
//!
//! # Token payload layout
//! - Bytes 0-31:   amount (uint256, big-endian, must fit in u128)
//! - Bytes 32-63:  recipient length (uint256, big-endian)
//! - Bytes 64-..:  recipient address (UTF-8)

use common::AssetInfo;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, Api, Binary, CosmosMsg, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

use crate::error::ContractError;

/// Largest recipient accepted in a token payload
const MAX_RECIPIENT_LEN: usize = 255;

#[cw_serde]
pub enum ResourceHandler {
    /// Mint a CW20 token the bridge is minter of
    Mint { token: Addr },
    /// Release native coins or CW20 tokens previously locked by deposits
    Unlock { asset: AssetInfo },
    /// Execute an arbitrary contract with the payload as its message
    Call { contract: Addr },
}

/// Message to run plus the locked balance it releases.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub msg: CosmosMsg,
    pub released: Option<(String, Uint128)>,
}

impl ResourceHandler {
    /// Address bound into the proposal data hash.
    pub fn address(&self) -> String {
        match self {
            ResourceHandler::Mint { token } => token.to_string(),
            ResourceHandler::Unlock { asset } => asset.key(),
            ResourceHandler::Call { contract } => contract.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceHandler::Mint { .. } => "mint",
            ResourceHandler::Unlock { .. } => "unlock",
            ResourceHandler::Call { .. } => "call",
        }
    }

    /// Build the destination-side effect for `payload`.
    pub fn apply_effect(&self, api: &dyn Api, payload: &[u8]) -> Result<Effect, ContractError> {
        match self {
            ResourceHandler::Mint { token } => {
                let transfer = TokenPayload::decode(payload)?;
                let recipient = transfer.validate_recipient(api)?;
                let msg = CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    msg: to_json_binary(&Cw20ExecuteMsg::Mint {
                        recipient: recipient.to_string(),
                        amount: transfer.amount,
                    })?,
                    funds: vec![],
                });
                Ok(Effect {
                    msg,
                    released: None,
                })
            }
            ResourceHandler::Unlock { asset } => {
                let transfer = TokenPayload::decode(payload)?;
                let recipient = transfer.validate_recipient(api)?;
                Ok(Effect {
                    msg: asset.transfer_msg(&recipient, transfer.amount)?,
                    released: Some((asset.key(), transfer.amount)),
                })
            }
            ResourceHandler::Call { contract } => {
                if payload.is_empty() {
                    return Err(ContractError::InvalidPayload {
                        reason: "empty call payload".to_string(),
                    });
                }
                Ok(Effect {
                    msg: CosmosMsg::Wasm(WasmMsg::Execute {
                        contract_addr: contract.to_string(),
                        msg: Binary::from(payload),
                        funds: vec![],
                    }),
                    released: None,
                })
            }
        }
    }
}

/// Amount and recipient carried by mint/unlock deposits.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    pub amount: Uint128,
    pub recipient: String,
}

impl TokenPayload {
    pub fn encode(&self) -> Binary {
        let recipient = self.recipient.as_bytes();
        let mut data = vec![0u8; 64 + recipient.len()];
        data[16..32].copy_from_slice(&self.amount.u128().to_be_bytes());
        data[56..64].copy_from_slice(&(recipient.len() as u64).to_be_bytes());
        data[64..].copy_from_slice(recipient);
        Binary::from(data)
    }

    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        if data.len() < 64 {
            return Err(invalid_payload(format!(
                "expected at least 64 bytes, got {}",
                data.len()
            )));
        }
        if data[0..16].iter().any(|b| *b != 0) {
            return Err(invalid_payload("amount exceeds 128 bits"));
        }
        if data[32..56].iter().any(|b| *b != 0) {
            return Err(invalid_payload("recipient length out of range"));
        }

        let mut amount = [0u8; 16];
        amount.copy_from_slice(&data[16..32]);
        let mut len = [0u8; 8];
        len.copy_from_slice(&data[56..64]);
        let len = u64::from_be_bytes(len) as usize;

        if len == 0 || len > MAX_RECIPIENT_LEN {
            return Err(invalid_payload("recipient length out of range"));
        }
        if data.len() != 64 + len {
            return Err(invalid_payload(format!(
                "expected {} bytes, got {}",
                64 + len,
                data.len()
            )));
        }

        let recipient = String::from_utf8(data[64..].to_vec())
            .map_err(|_| invalid_payload("recipient is not UTF-8"))?;

        Ok(TokenPayload {
            amount: Uint128::new(u128::from_be_bytes(amount)),
            recipient,
        })
    }

    fn validate_recipient(&self, api: &dyn Api) -> Result<Addr, ContractError> {
        if self.amount.is_zero() {
            return Err(invalid_payload("zero amount"));
        }
        api.addr_validate(&self.recipient)
            .map_err(|e| invalid_payload(format!("recipient: {}", e)))
    }
}

fn invalid_payload(reason: impl Into<String>) -> ContractError {
    ContractError::InvalidPayload {
        reason: reason.into(),
    }
}
