//! Short-TTL caches shared by the scanning pipeline
//!
//! `ScoutCaches` is built once per process and handed (`Arc`) to the chain
//! reader, scanner, processor and score calculator. Each region has its own
//! typed `CacheManager` and TTL.

pub mod config;
pub mod manager;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheMetrics};

use crate::config::CacheTtlConfig;
use crate::logger::{self, LogTag};
use crate::score::{EarlyScore, ScoreKey};
use crate::types::{ContractFields, MintEvent, NftMetadata};
use ethers::types::Address;

/// All cache regions used by mintscout
pub struct ScoutCaches {
    /// Current block height (short TTL)
    pub block_height: CacheManager<(), u64>,
    /// Mint-scan results keyed by requested block range (short TTL)
    pub scans: CacheManager<u64, Vec<MintEvent>>,
    /// ERC-721 interface check outcome per contract
    pub interface_checks: CacheManager<Address, bool>,
    /// name / symbol / totalSupply per contract
    pub contract_fields: CacheManager<Address, ContractFields>,
    /// Parsed metadata documents keyed by token URI
    pub metadata: CacheManager<String, NftMetadata>,
    /// Early scores keyed by every input taken from the record
    pub scores: CacheManager<ScoreKey, EarlyScore>,
}

impl ScoutCaches {
    pub fn new(settings: &CacheTtlConfig) -> Self {
        let (general, block_height, scans) = CacheConfig::from_settings(settings);
        Self {
            block_height: CacheManager::new(block_height),
            scans: CacheManager::new(scans),
            interface_checks: CacheManager::new(general),
            contract_fields: CacheManager::new(general),
            metadata: CacheManager::new(general),
            scores: CacheManager::new(general),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&CacheTtlConfig::default())
    }

    /// Clear every region
    pub fn clear(&self) {
        self.block_height.clear();
        self.scans.clear();
        self.interface_checks.clear();
        self.contract_fields.clear();
        self.metadata.clear();
        self.scores.clear();
    }

    /// Evict expired entries in every region
    pub fn clear_expired(&self) -> usize {
        let removed = self.block_height.clear_expired()
            + self.scans.clear_expired()
            + self.interface_checks.clear_expired()
            + self.contract_fields.clear_expired()
            + self.metadata.clear_expired()
            + self.scores.clear_expired();

        if removed > 0 {
            logger::debug(
                LogTag::Cache,
                &format!("Evicted {} expired cache entries", removed),
            );
        }
        removed
    }

    /// One-line summary of region sizes and hit rates
    pub fn summary(&self) -> String {
        format!(
            "scans={} ({:.0}% hit) contracts={} metadata={} scores={} ({:.0}% hit)",
            self.scans.len(),
            self.scans.metrics().hit_rate() * 100.0,
            self.contract_fields.len(),
            self.metadata.len(),
            self.scores.len(),
            self.scores.metrics().hit_rate() * 100.0,
        )
    }
}
