//! Read-only EVM access
//!
//! - `transport`: raw JSON-RPC methods behind the `EvmTransport` trait
//! - `reader`: timeout/retry policy, block-height caching, log-window clamping
//! - `abi`: ERC-721 call encoding and return decoding
//! - `types`: errors, retry policy and request statistics

pub mod abi;
pub mod reader;
pub mod transport;
pub mod types;

pub use abi::{ContractCall, ContractValue};
pub use reader::{clamp_block_range, mint_filter, ChainReader};
pub use transport::{EvmTransport, HttpTransport};
pub use types::{RetryPolicy, RpcError, RpcResult, RpcStats};
