/// Cache configuration per region
///
/// TTLs tuned for how fast each kind of data goes stale:
/// - General (interface checks, contract fields, metadata, scores): 5 minutes
/// - Block height: 5 seconds
/// - Mint-scan results: 10 seconds
use crate::config::CacheTtlConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for cached entries
    pub ttl: Duration,
}

impl CacheConfig {
    /// Contract data and derived scores
    pub fn general() -> Self {
        Self {
            ttl: Duration::from_secs(300),
        }
    }

    /// Current chain height
    pub fn block_height() -> Self {
        Self {
            ttl: Duration::from_secs(5),
        }
    }

    /// Whole mint-scan result lists
    pub fn scan_results() -> Self {
        Self {
            ttl: Duration::from_secs(10),
        }
    }

    /// Custom configuration
    pub fn custom(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Region configs from the `[cache]` section: (general, block height, scans)
    pub fn from_settings(settings: &CacheTtlConfig) -> (Self, Self, Self) {
        (
            Self::custom(Duration::from_secs(settings.general_ttl_secs)),
            Self::custom(Duration::from_secs(settings.block_height_ttl_secs)),
            Self::custom(Duration::from_secs(settings.scan_ttl_secs)),
        )
    }
}
