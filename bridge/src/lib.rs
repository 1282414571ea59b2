//! Quorum Bridge Contract - Cross-Domain Deposits with Relayer Quorum
//!
//! This contract moves assets between domains. A deposit on the origin domain
//! is attested on the destination domain either by a quorum of relayer votes
//! or by a single signature from a threshold-signing authority.
//!
//! # Origin Flow (Deposit)
//! 1. User deposits through `Deposit` (native) or a CW20 `Send`
//! 2. Tokens are locked (unlock resources) or burned (mint resources)
//! 3. The deposit is assigned the next nonce and emitted as a `deposit` event
//!
//! # Destination Flow (Vote)
//! 1. Relayers `Vote` on `(origin, nonce, data hash)`; the first vote opens the proposal
//! 2. The vote reaching the threshold passes the proposal and dispatches the resource handler
//! 3. Proposals that do not pass within `expiry` blocks can be cancelled by anyone
//!
//! # Destination Flow (Signature)
//! 1. Anyone submits `ExecuteWithSignature` with the authority's signature
//! 2. The handler is dispatched without a proposal
//!
//! # Security
//! - One execution record per `(origin, nonce)`, shared by both flows
//! - One stable vote index per relayer address, kept across removal
//! - Emergency pause functionality

pub mod contract;
pub mod error;
mod execute;
pub mod handler;
pub mod hash;
pub mod msg;
pub mod proposal;
mod query;
pub mod signature;
pub mod state;

pub use crate::error::ContractError;
pub use crate::handler::{ResourceHandler, TokenPayload};
pub use crate::hash::{compute_data_hash, compute_signature_message, keccak256};
pub use crate::proposal::{Proposal, ProposalStatus};
