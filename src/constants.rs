/// Global constants used across mintscout
///
/// This module contains chain-level constants that are not configurable
/// and are used across multiple modules.

// ============================================================================
// ERC-721 / EVM CONSTANTS
// ============================================================================

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Canonical Transfer event signature (ERC-20 and ERC-721 share topic0)
pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// ERC-165 interface id for ERC-721
pub const ERC721_INTERFACE_ID: [u8; 4] = [0x80, 0xac, 0x58, 0xcd];

// ============================================================================
// FALLBACK VALUES
// ============================================================================

/// Contract name used when `name()` cannot be read
pub const UNKNOWN_NAME: &str = "Unknown";

/// Contract symbol used when `symbol()` cannot be read
pub const UNKNOWN_SYMBOL: &str = "???";

/// Token name used when a metadata document carries none
pub const UNNAMED_NFT: &str = "Unnamed NFT";

/// Mint count assumed when the caller has no per-contract count
pub const DEFAULT_RECENT_MINT_COUNT: usize = 1;

/// Public IPFS gateway used to resolve `ipfs://` URIs
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Default JSON-RPC endpoint (Base mainnet)
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
