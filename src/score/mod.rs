//! Early score: five 0..=20 factors summed into a 0..=100 rating
//!
//! Factors, in reason order: supply, recency, velocity, verification and
//! metadata readiness (reported as `diversity_score`). Only recency needs the
//! network (current block height); everything else reads the record.

pub mod factors;

pub use factors::{
    metadata_score, recency_score, supply_score, velocity_score, verification_score,
};

use crate::cache::ScoutCaches;
use crate::logger::{self, LogTag};
use crate::rpc::ChainReader;
use crate::types::NftContractRecord;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub supply_score: u8,
    pub recency_score: u8,
    pub velocity_score: u8,
    pub verification_score: u8,
    pub diversity_score: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.supply_score
            + self.recency_score
            + self.velocity_score
            + self.verification_score
            + self.diversity_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyScore {
    /// Always equal to `breakdown.total()`
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

impl EarlyScore {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }
}

/// Display bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Hot,
    Warm,
    Mild,
    Cold,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreTier::Hot,
            60..=79 => ScoreTier::Warm,
            40..=59 => ScoreTier::Mild,
            _ => ScoreTier::Cold,
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreTier::Hot => "HOT",
            ScoreTier::Warm => "WARM",
            ScoreTier::Mild => "MILD",
            ScoreTier::Cold => "COLD",
        };
        write!(f, "{}", label)
    }
}

/// Pure scoring over a record, a mint count and an optional block height
pub fn compute_early_score(
    record: &NftContractRecord,
    recent_mint_count: usize,
    current_block: Option<u64>,
) -> EarlyScore {
    let has_image = record
        .metadata
        .as_ref()
        .map(|m| m.has_image())
        .unwrap_or(false);

    let (supply, supply_reason) = supply_score(record.total_supply);
    let (recency, recency_reason) = recency_score(record.mint_block, current_block);
    let (velocity, velocity_reason) = velocity_score(recent_mint_count);
    let (verification, verification_reason) = verification_score(record.is_verified);
    let (diversity, diversity_reason) = metadata_score(record.metadata.is_some(), has_image);

    let breakdown = ScoreBreakdown {
        supply_score: supply,
        recency_score: recency,
        velocity_score: velocity,
        verification_score: verification,
        diversity_score: diversity,
    };

    let reasons = [
        supply_reason,
        recency_reason,
        velocity_reason,
        verification_reason,
        diversity_reason,
    ]
    .into_iter()
    .flatten()
    .collect();

    EarlyScore {
        score: breakdown.total(),
        breakdown,
        reasons,
    }
}

/// Every score input taken from the record, plus the mint count
///
/// Any change to the contract data yields a new key, so a changed record is
/// always rescored rather than served from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub address: Address,
    pub recent_mint_count: usize,
    pub mint_block: u64,
    pub total_supply: U256,
    pub is_verified: bool,
    pub has_metadata: bool,
    pub has_image: bool,
}

impl ScoreKey {
    pub fn new(record: &NftContractRecord, recent_mint_count: usize) -> Self {
        Self {
            address: record.address,
            recent_mint_count,
            mint_block: record.mint_block,
            total_supply: record.total_supply,
            is_verified: record.is_verified,
            has_metadata: record.metadata.is_some(),
            has_image: record.metadata.as_ref().map(|m| m.has_image()).unwrap_or(false),
        }
    }
}

/// Scores records against the current chain height, with caching
pub struct ScoreCalculator {
    reader: Arc<ChainReader>,
    caches: Arc<ScoutCaches>,
}

impl ScoreCalculator {
    pub fn new(reader: Arc<ChainReader>, caches: Arc<ScoutCaches>) -> Self {
        Self { reader, caches }
    }

    /// Score one record; cached per `ScoreKey`
    ///
    /// A score computed without a block height is returned but not cached, so
    /// the next call can pick up the recency points.
    pub async fn calculate_early_score(
        &self,
        record: &NftContractRecord,
        recent_mint_count: usize,
    ) -> EarlyScore {
        let key = ScoreKey::new(record, recent_mint_count);
        if let Some(score) = self.caches.scores.get(&key) {
            return score;
        }

        let current_block = self.block_height().await;
        self.score_with_height(key, record, current_block)
    }

    /// Score a whole cycle against a single block-height read
    pub async fn calculate_early_scores(
        &self,
        entries: &[(&NftContractRecord, usize)],
    ) -> Vec<EarlyScore> {
        let keys: Vec<ScoreKey> = entries
            .iter()
            .map(|(record, count)| ScoreKey::new(record, *count))
            .collect();
        let cached: Vec<Option<EarlyScore>> =
            keys.iter().map(|key| self.caches.scores.get(key)).collect();

        let current_block = if cached.iter().any(Option::is_none) {
            self.block_height().await
        } else {
            None
        };

        entries
            .iter()
            .zip(keys)
            .zip(cached)
            .map(|(((record, _), key), hit)| match hit {
                Some(score) => score,
                None => self.score_with_height(key, record, current_block),
            })
            .collect()
    }

    async fn block_height(&self) -> Option<u64> {
        match self.reader.current_block_height().await {
            Ok(height) => Some(height),
            Err(e) => {
                logger::warning(
                    LogTag::Score,
                    &format!("Block height unavailable, scoring without recency: {}", e),
                );
                None
            }
        }
    }

    fn score_with_height(
        &self,
        key: ScoreKey,
        record: &NftContractRecord,
        current_block: Option<u64>,
    ) -> EarlyScore {
        let score = compute_early_score(record, key.recent_mint_count, current_block);

        logger::debug(
            LogTag::Score,
            &format!(
                "{:?} ({}) scored {} [{}]",
                record.address,
                record.symbol,
                score.score,
                score.reasons.join("; ")
            ),
        );

        if current_block.is_some() {
            self.caches.scores.set(key, score.clone());
        }
        score
    }
}
