/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro which provides
/// embedded defaults and serde support.
use crate::config_struct;
use crate::constants::{DEFAULT_IPFS_GATEWAY, DEFAULT_RPC_URL};
use std::time::Duration;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// JSON-RPC endpoint and call policy
    pub struct RpcConfig {
        /// HTTP JSON-RPC endpoint
        url: String = DEFAULT_RPC_URL.to_string(),

        /// Per-call timeout
        timeout_secs: u64 = 15,

        /// Extra attempts after the first failure (0..=2)
        retry_count: u32 = 2,

        /// Fixed delay between attempts
        retry_delay_ms: u64 = 500,

        /// Widest eth_getLogs window, counted back from the upper bound
        max_log_block_range: u64 = 30,
    }
}

// ============================================================================
// CACHE CONFIGURATION
// ============================================================================

config_struct! {
    /// Time-to-live per cache region
    pub struct CacheTtlConfig {
        /// Interface checks, contract fields, metadata and scores
        general_ttl_secs: u64 = 300,

        /// Current block height
        block_height_ttl_secs: u64 = 5,

        /// Full mint-scan result lists
        scan_ttl_secs: u64 = 10,
    }
}

// ============================================================================
// SCANNER CONFIGURATION
// ============================================================================

config_struct! {
    /// Mint scanner configuration
    pub struct ScannerConfig {
        /// Blocks to look back for discovery
        block_range: u64 = 50,

        /// Blocks to look back when checking a wallet
        wallet_block_range: u64 = 100,
    }
}

// ============================================================================
// PROCESSOR CONFIGURATION
// ============================================================================

config_struct! {
    /// Contract processor configuration
    pub struct ProcessorConfig {
        /// Contracts verified and enriched concurrently per batch (2..=5)
        batch_size: usize = 5,

        /// Whole-request timeout for a metadata document
        metadata_timeout_ms: u64 = 3000,

        /// Gateway prefix substituted for `ipfs://`
        ipfs_gateway: String = DEFAULT_IPFS_GATEWAY.to_string(),
    }
}

// ============================================================================
// WALLET CONFIGURATION
// ============================================================================

config_struct! {
    /// Wallet ownership checker configuration
    pub struct WalletConfig {
        /// balanceOf queries in flight per batch
        concurrency: usize = 5,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        /// RPC configuration
        rpc: RpcConfig = RpcConfig::default(),

        /// Cache TTLs
        cache: CacheTtlConfig = CacheTtlConfig::default(),

        /// Scanner configuration
        scanner: ScannerConfig = ScannerConfig::default(),

        /// Processor configuration
        processor: ProcessorConfig = ProcessorConfig::default(),

        /// Wallet checker configuration
        wallet: WalletConfig = WalletConfig::default(),
    }
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl ProcessorConfig {
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc.url.trim().is_empty() {
            return Err("RPC url cannot be empty".to_string());
        }

        if self.rpc.timeout_secs == 0 {
            return Err("RPC timeout_secs must be > 0".to_string());
        }

        if self.rpc.retry_count > 2 {
            return Err(format!(
                "RPC retry_count must be at most 2, got {}",
                self.rpc.retry_count
            ));
        }

        if self.rpc.max_log_block_range == 0 {
            return Err("RPC max_log_block_range must be > 0".to_string());
        }

        if self.cache.general_ttl_secs == 0
            || self.cache.block_height_ttl_secs == 0
            || self.cache.scan_ttl_secs == 0
        {
            return Err("Cache TTLs must be > 0".to_string());
        }

        if !(2..=5).contains(&self.processor.batch_size) {
            return Err(format!(
                "Processor batch_size must be between 2 and 5, got {}",
                self.processor.batch_size
            ));
        }

        if self.processor.metadata_timeout_ms == 0 {
            return Err("Processor metadata_timeout_ms must be > 0".to_string());
        }

        if self.wallet.concurrency == 0 {
            return Err("Wallet concurrency must be > 0".to_string());
        }

        Ok(())
    }
}
