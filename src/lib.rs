//! mintscout: discover freshly minted ERC-721 collections on an EVM chain
//! and rate how early they are.

pub mod arguments;
pub mod cache;
pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod logger;
pub mod processor;
pub mod rpc;
pub mod scanner;
pub mod score;
pub mod scout;
pub mod types;
pub mod utils;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use errors::{ScoutError, ScoutResult, SkipReason};
pub use scout::{DiscoveryReport, MintScout, RankedContract, WalletReport};
