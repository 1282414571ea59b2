//! Execute handlers for the quorum bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `deposit` - Deposit and Receive handlers on the origin side
//! - `voting` - Vote, Cancel and ExecuteProposal handlers
//! - `authority` - ExecuteWithSignature handler
//! - `dispatch` - Effect dispatch and reply handling shared by the execution paths
//! - `config` - Relayer set, expiry, resource and domain management
//! - `admin` - Pause, unpause and authority configuration

mod admin;
mod authority;
mod config;
mod deposit;
mod dispatch;
mod voting;

pub use admin::*;
pub use authority::*;
pub use config::*;
pub use deposit::*;
pub use dispatch::*;
pub use voting::*;
