/// Error handling for mintscout
///
/// `ScoutError` is what the public facade returns. Per-contract failures inside
/// the processing pipeline never become a `ScoutError`; they are reported as a
/// `SkipReason` and the contract is left out of the results.
use thiserror::Error;

use crate::rpc::RpcError;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Top-level scan failure, the only error the presentation layer sees
    #[error("Failed to fetch NFTs: {reason}")]
    FetchFailed { reason: String },
}

pub type ScoutResult<T> = Result<T, ScoutError>;

/// Why a candidate contract was left out of a scan cycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("contract does not report ERC-721 support")]
    NotErc721,

    #[error("interface check failed: {0}")]
    InterfaceCheckFailed(String),

    #[error("no mint events for contract")]
    NoMintEvents,
}

impl SkipReason {
    /// Short label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NotErc721 => "NOT_ERC721",
            SkipReason::InterfaceCheckFailed(_) => "INTERFACE_CHECK_FAILED",
            SkipReason::NoMintEvents => "NO_MINT_EVENTS",
        }
    }
}
