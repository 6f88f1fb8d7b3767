//! Mint scanner: recent zero-address Transfer logs turned into `MintEvent`s

pub mod grouping;

pub use grouping::{group_by_contract, mint_counts, unique_contracts, ContractMints};

use crate::cache::ScoutCaches;
use crate::constants::TRANSFER_EVENT_TOPIC;
use crate::logger::{self, LogTag};
use crate::rpc::{ChainReader, RpcResult};
use crate::types::MintEvent;
use ethers::types::{Address, Log, H256, U256};
use once_cell::sync::Lazy;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

static TRANSFER_TOPIC: Lazy<H256> =
    Lazy::new(|| H256::from_str(TRANSFER_EVENT_TOPIC).unwrap_or_default());

/// Decode one raw log into a mint event
///
/// Returns `None` for anything that is not an ERC-721 mint: removed or pending
/// logs, other events, ERC-20 transfers (three topics) and non-zero senders.
pub fn decode_mint_log(log: &Log) -> Option<MintEvent> {
    if log.removed == Some(true) {
        return None;
    }

    if log.topics.len() != 4 || log.topics[0] != *TRANSFER_TOPIC || log.topics[1] != H256::zero() {
        return None;
    }

    Some(MintEvent {
        contract_address: log.address,
        minter: Address::from_slice(&log.topics[2].as_bytes()[12..]),
        token_id: U256::from_big_endian(log.topics[3].as_bytes()),
        block_number: log.block_number?.as_u64(),
        transaction_hash: log.transaction_hash?,
        log_index: log.log_index.map(|i| i.low_u64()).unwrap_or_default(),
    })
}

pub struct MintScanner {
    reader: Arc<ChainReader>,
    caches: Arc<ScoutCaches>,
    /// Serializes cache-miss scans so concurrent callers share one result
    scan_guard: Mutex<()>,
}

impl MintScanner {
    pub fn new(reader: Arc<ChainReader>, caches: Arc<ScoutCaches>) -> Self {
        Self {
            reader,
            caches,
            scan_guard: Mutex::new(()),
        }
    }

    /// Mint events from the last `block_range` blocks
    ///
    /// The effective window is additionally capped by the reader's log range.
    pub async fn scan_recent_mints(&self, block_range: u64) -> RpcResult<Vec<MintEvent>> {
        if let Some(events) = self.caches.scans.get(&block_range) {
            return Ok(events);
        }

        let _guard = self.scan_guard.lock().await;

        // Another caller may have finished the scan while we waited
        if let Some(events) = self.caches.scans.get(&block_range) {
            logger::debug(
                LogTag::Scanner,
                &format!("Reusing scan of {} blocks from concurrent caller", block_range),
            );
            return Ok(events);
        }

        let started = Instant::now();
        let height = self.reader.current_block_height().await?;
        let from_block = height.saturating_sub(block_range);
        let logs = self.reader.query_mint_logs(from_block, height).await?;

        let events: Vec<MintEvent> = logs.iter().filter_map(decode_mint_log).collect();
        let skipped = logs.len() - events.len();

        if skipped > 0 {
            logger::debug(
                LogTag::Scanner,
                &format!("Skipped {} logs that are not ERC-721 mints", skipped),
            );
        }

        logger::info(
            LogTag::Scanner,
            &format!(
                "Found {} mints across {} contracts up to block {} in {}ms",
                events.len(),
                mint_counts(&events).len(),
                height,
                started.elapsed().as_millis()
            ),
        );

        self.caches.scans.set(block_range, events.clone());
        Ok(events)
    }
}
