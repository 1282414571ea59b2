//! Proposal store and lifecycle state machine.
//!
//! A proposal is keyed by `(origin_domain_id, deposit_nonce, data_hash)` and
//! moves only along `Active -> Passed -> Executed` or `Active -> Cancelled`.
//! `Inactive` is the state of a key with no stored record. Expiry is evaluated
//! lazily against the block height of the interacting call.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage};
use cw_storage_plus::Map;

use crate::error::ContractError;

/// Proposals by (origin domain, deposit nonce, data hash)
pub const PROPOSALS: Map<(u8, u64, &[u8]), Proposal> = Map::new("proposals");

#[cw_serde]
#[derive(Copy, Eq)]
pub enum ProposalStatus {
    Inactive,
    Active,
    Passed,
    Executed,
    Cancelled,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Inactive => "inactive",
            ProposalStatus::Active => "active",
            ProposalStatus::Passed => "passed",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Cancelled => "cancelled",
        }
    }
}

/// Set of relayer indices (0..=255) that voted yes.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub struct VoteBitmap {
    bits: [u8; 32],
}

impl VoteBitmap {
    pub fn contains(&self, index: u8) -> bool {
        self.bits[(index / 8) as usize] & (1 << (index % 8)) != 0
    }

    /// Returns false if the index was already present.
    pub fn insert(&mut self, index: u8) -> bool {
        if self.contains(index) {
            return false;
        }
        self.bits[(index / 8) as usize] |= 1 << (index % 8);
        true
    }

    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    pub fn indices(&self) -> Vec<u8> {
        (0..=u8::MAX).filter(|i| self.contains(*i)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bits
    }
}

/// Result of applying a relayer vote to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Vote recorded, threshold not yet reached.
    Counted,
    /// Vote recorded and the proposal passed.
    Passed,
    /// Relayer had already voted; nothing changed.
    DuplicateIgnored,
    /// Proposal expired before this vote and is now cancelled; vote not counted.
    Expired,
}

#[cw_serde]
pub struct Proposal {
    pub status: ProposalStatus,
    pub yes_votes: VoteBitmap,
    pub yes_votes_total: u32,
    pub proposed_block: u64,
}

impl Proposal {
    pub fn new(proposed_block: u64) -> Self {
        Proposal {
            status: ProposalStatus::Active,
            yes_votes: VoteBitmap::default(),
            yes_votes_total: 0,
            proposed_block,
        }
    }

    pub fn is_expired(&self, height: u64, expiry: u64) -> bool {
        height.saturating_sub(self.proposed_block) > expiry
    }

    pub fn is_finalized(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Executed | ProposalStatus::Cancelled
        )
    }

    pub fn has_voted(&self, relayer_index: u8) -> bool {
        self.yes_votes.contains(relayer_index)
    }

    /// Apply a yes vote from `relayer_index` at `height`.
    ///
    /// An expired active proposal is cancelled and reported as
    /// [`VoteOutcome::Expired`]; the caller must persist that transition.
    pub fn vote(
        &mut self,
        relayer_index: u8,
        height: u64,
        expiry: u64,
        threshold: u32,
    ) -> Result<VoteOutcome, ContractError> {
        match self.status {
            ProposalStatus::Executed | ProposalStatus::Cancelled => {
                return Err(ContractError::AlreadyFinalized)
            }
            ProposalStatus::Passed => return Err(ContractError::AlreadyPassed),
            ProposalStatus::Inactive | ProposalStatus::Active => {}
        }

        if self.is_expired(height, expiry) {
            self.status = ProposalStatus::Cancelled;
            return Ok(VoteOutcome::Expired);
        }

        self.status = ProposalStatus::Active;

        if !self.yes_votes.insert(relayer_index) {
            return Ok(VoteOutcome::DuplicateIgnored);
        }
        self.yes_votes_total += 1;

        if self.yes_votes_total >= threshold {
            self.status = ProposalStatus::Passed;
            return Ok(VoteOutcome::Passed);
        }

        Ok(VoteOutcome::Counted)
    }

    /// Cancel an expired active proposal.
    pub fn cancel(&mut self, height: u64, expiry: u64) -> Result<(), ContractError> {
        if self.status != ProposalStatus::Active || !self.is_expired(height, expiry) {
            return Err(ContractError::CannotCancel);
        }
        self.status = ProposalStatus::Cancelled;
        Ok(())
    }

    /// Passed -> Executed, ahead of handler dispatch.
    pub fn mark_executed(&mut self) -> Result<(), ContractError> {
        match self.status {
            ProposalStatus::Passed => {
                self.status = ProposalStatus::Executed;
                Ok(())
            }
            ProposalStatus::Cancelled => Err(ContractError::AlreadyFinalized),
            _ => Err(ContractError::ProposalNotPassed),
        }
    }

    /// Executed -> Passed, when the dispatched effect failed.
    pub fn revert_execution(&mut self) {
        if self.status == ProposalStatus::Executed {
            self.status = ProposalStatus::Passed;
        }
    }
}

pub fn get(
    storage: &dyn Storage,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: &[u8; 32],
) -> StdResult<Option<Proposal>> {
    PROPOSALS.may_load(storage, (origin_domain_id, deposit_nonce, data_hash.as_slice()))
}

/// Load the proposal, creating an `Active` one at `height` if none exists.
/// The flag is true when the record was created by this call.
pub fn get_or_create(
    storage: &mut dyn Storage,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: &[u8; 32],
    height: u64,
) -> StdResult<(Proposal, bool)> {
    if let Some(proposal) = get(storage, origin_domain_id, deposit_nonce, data_hash)? {
        return Ok((proposal, false));
    }

    let proposal = Proposal::new(height);
    save(storage, origin_domain_id, deposit_nonce, data_hash, &proposal)?;
    Ok((proposal, true))
}

pub fn save(
    storage: &mut dyn Storage,
    origin_domain_id: u8,
    deposit_nonce: u64,
    data_hash: &[u8; 32],
    proposal: &Proposal,
) -> StdResult<()> {
    PROPOSALS.save(
        storage,
        (origin_domain_id, deposit_nonce, data_hash.as_slice()),
        proposal,
    )
}
