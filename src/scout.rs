//! `MintScout`: the service facade consumed by the CLI
//!
//! Wires transport, caches, reader, scanner, processor, scorer and wallet
//! checker together and exposes the two user-facing flows: discovery and
//! wallet holdings. Only a failed mint scan surfaces as an error.

use crate::cache::ScoutCaches;
use crate::config::Config;
use crate::constants::DEFAULT_RECENT_MINT_COUNT;
use crate::errors::{ScoutError, ScoutResult};
use crate::logger::{self, LogTag};
use crate::processor::{ContractProcessor, HttpMetadataFetcher, MetadataSource};
use crate::rpc::{ChainReader, EvmTransport, HttpTransport, RpcStats};
use crate::scanner::{mint_counts, MintScanner};
use crate::score::{EarlyScore, ScoreCalculator};
use crate::types::NftContractRecord;
use crate::wallet::{parse_wallet_address, WalletChecker};
use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One scored contract, as rendered by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedContract {
    pub contract: NftContractRecord,
    pub recent_mint_count: usize,
    pub score: EarlyScore,
}

/// Result of one discovery cycle
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub scanned_at: DateTime<Utc>,
    pub block_range: u64,
    /// Raw mint events seen in the window
    pub mint_events: usize,
    /// Verified contracts in first-seen order
    pub contracts: Vec<NftContractRecord>,
    pub mint_counts: HashMap<Address, usize>,
    pub scores: HashMap<Address, EarlyScore>,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Contracts with their scores, best first; ties keep first-seen order
    pub fn ranked(&self) -> Vec<RankedContract> {
        let mut ranked: Vec<RankedContract> = self
            .contracts
            .iter()
            .filter_map(|contract| {
                self.scores.get(&contract.address).map(|score| RankedContract {
                    contract: contract.clone(),
                    recent_mint_count: self
                        .mint_counts
                        .get(&contract.address)
                        .copied()
                        .unwrap_or(DEFAULT_RECENT_MINT_COUNT),
                    score: score.clone(),
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.score.cmp(&a.score.score));
        ranked
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.contracts.iter().map(|c| c.address).collect()
    }
}

/// Collections from a recent window that a wallet holds
#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub wallet: Address,
    pub block_range: u64,
    pub candidates: usize,
    pub owned: Vec<RankedContract>,
}

pub struct MintScout {
    config: Config,
    caches: Arc<ScoutCaches>,
    reader: Arc<ChainReader>,
    scanner: MintScanner,
    processor: ContractProcessor,
    scorer: ScoreCalculator,
    wallet: WalletChecker,
}

impl MintScout {
    /// Build against the configured HTTP JSON-RPC endpoint
    pub fn new(config: &Config) -> ScoutResult<Self> {
        config.validate().map_err(ScoutError::Config)?;

        let transport = Arc::new(HttpTransport::new(&config.rpc.url)?);
        let metadata = Arc::new(HttpMetadataFetcher::new(
            config.processor.metadata_timeout(),
            &config.processor.ipfs_gateway,
        ));

        logger::info(LogTag::System, &format!("Using RPC endpoint {}", transport.url()));
        Ok(Self::with_transport(config, transport, metadata))
    }

    /// Build from explicit transport and metadata source
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn EvmTransport>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        let caches = Arc::new(ScoutCaches::new(&config.cache));
        let reader = Arc::new(ChainReader::new(transport, caches.clone(), &config.rpc));

        Self {
            config: config.clone(),
            scanner: MintScanner::new(reader.clone(), caches.clone()),
            processor: ContractProcessor::new(
                reader.clone(),
                metadata,
                caches.clone(),
                &config.processor,
            ),
            scorer: ScoreCalculator::new(reader.clone(), caches.clone()),
            wallet: WalletChecker::new(reader.clone(), config.wallet.concurrency),
            caches,
            reader,
        }
    }

    pub fn caches(&self) -> &ScoutCaches {
        &self.caches
    }

    pub fn rpc_stats(&self) -> RpcStats {
        self.reader.stats()
    }

    /// Scan the last `block_range` blocks, verify, enrich and score
    pub async fn discover(&self, block_range: u64) -> ScoutResult<DiscoveryReport> {
        self.caches.clear_expired();
        logger::info(
            LogTag::Scanner,
            &format!("Scanning the last {} blocks for new ERC-721 mints", block_range),
        );

        let events = self
            .scanner
            .scan_recent_mints(block_range)
            .await
            .map_err(|e| {
                logger::error(LogTag::Scanner, &format!("Mint scan failed: {}", e));
                ScoutError::FetchFailed {
                    reason: e.to_string(),
                }
            })?;

        let counts = mint_counts(&events);
        let contracts = self.processor.process_contracts(&events).await;

        let entries: Vec<(&NftContractRecord, usize)> = contracts
            .iter()
            .map(|contract| {
                let count = counts
                    .get(&contract.address)
                    .copied()
                    .unwrap_or(DEFAULT_RECENT_MINT_COUNT);
                (contract, count)
            })
            .collect();

        let scores: HashMap<Address, EarlyScore> = contracts
            .iter()
            .map(|contract| contract.address)
            .zip(self.scorer.calculate_early_scores(&entries).await)
            .collect();

        logger::debug(LogTag::Cache, &self.caches.summary());

        Ok(DiscoveryReport {
            scanned_at: Utc::now(),
            block_range,
            mint_events: events.len(),
            contracts,
            mint_counts: counts,
            scores,
        })
    }

    /// Discovery with the configured block range
    pub async fn discover_default(&self) -> ScoutResult<DiscoveryReport> {
        self.discover(self.config.scanner.block_range).await
    }

    /// Which of `contracts` the wallet holds, with the configured concurrency
    pub async fn wallet_holdings(&self, wallet: Address, contracts: &[Address]) -> Vec<Address> {
        self.wallet.check(wallet, contracts).await
    }

    /// Full wallet flow: validate input, scan the wallet window, keep held
    /// collections and score them with the default mint count
    pub async fn scan_wallet(&self, wallet_input: &str) -> ScoutResult<WalletReport> {
        let wallet = parse_wallet_address(wallet_input)?;
        let block_range = self.config.scanner.wallet_block_range;

        let events = self
            .scanner
            .scan_recent_mints(block_range)
            .await
            .map_err(|e| ScoutError::FetchFailed {
                reason: e.to_string(),
            })?;
        let contracts = self.processor.process_contracts(&events).await;
        let candidates: Vec<Address> = contracts.iter().map(|c| c.address).collect();

        let owned = self.wallet_holdings(wallet, &candidates).await;

        let entries: Vec<(&NftContractRecord, usize)> = contracts
            .iter()
            .filter(|c| owned.contains(&c.address))
            .map(|c| (c, DEFAULT_RECENT_MINT_COUNT))
            .collect();
        let scores = self.scorer.calculate_early_scores(&entries).await;

        let owned: Vec<RankedContract> = entries
            .iter()
            .zip(scores)
            .map(|((contract, count), score)| RankedContract {
                contract: (*contract).clone(),
                recent_mint_count: *count,
                score,
            })
            .collect();

        Ok(WalletReport {
            wallet,
            block_range,
            candidates: candidates.len(),
            owned,
        })
    }
}
