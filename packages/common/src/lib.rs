//! Common - Shared Types and Utilities for Quorum Bridge Contracts
//!
//! This package provides shared type definitions and utility functions
//! used by the bridge contract and by callers building its messages.

pub mod asset;

pub use asset::AssetInfo;
