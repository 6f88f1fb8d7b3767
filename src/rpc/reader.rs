//! Chain reader: timeouts, retries, block-height caching and mint-log queries
//!
//! Every network call goes through `with_retry`, which bounds each attempt by
//! the configured timeout and retries with a fixed delay. Decoding failures
//! are not retried.

use super::abi::{ContractCall, ContractValue};
use super::transport::EvmTransport;
use super::types::{RetryPolicy, RpcError, RpcResult, RpcStats};
use crate::cache::ScoutCaches;
use crate::config::RpcConfig;
use crate::constants::TRANSFER_EVENT_SIGNATURE;
use crate::logger::{self, LogTag};
use ethers::types::{Address, Filter, Log, H256, U256};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// Narrow `[from_block, to_block]` to at most `max_span` blocks ending at `to_block`
///
/// Wider requests are silently truncated: the scan window is bounded on
/// purpose and older mints are simply not seen.
pub fn clamp_block_range(from_block: u64, to_block: u64, max_span: u64) -> (u64, u64) {
    if to_block.saturating_sub(from_block) > max_span {
        (to_block - max_span, to_block)
    } else {
        (from_block, to_block)
    }
}

/// `Transfer` logs whose indexed `from` is the zero address
pub fn mint_filter(from_block: u64, to_block: u64) -> Filter {
    Filter::new()
        .from_block(from_block)
        .to_block(to_block)
        .event(TRANSFER_EVENT_SIGNATURE)
        .topic1(H256::zero())
}

pub struct ChainReader {
    transport: Arc<dyn EvmTransport>,
    caches: Arc<ScoutCaches>,
    policy: RetryPolicy,
    max_log_block_range: u64,
    stats: Mutex<RpcStats>,
}

impl ChainReader {
    pub fn new(
        transport: Arc<dyn EvmTransport>,
        caches: Arc<ScoutCaches>,
        config: &RpcConfig,
    ) -> Self {
        Self {
            transport,
            caches,
            policy: RetryPolicy::from_config(config),
            max_log_block_range: config.max_log_block_range,
            stats: Mutex::new(RpcStats::default()),
        }
    }

    pub fn stats(&self) -> RpcStats {
        self.stats.lock().clone()
    }

    /// Current chain height, served from the block-height cache when fresh
    pub async fn current_block_height(&self) -> RpcResult<u64> {
        if let Some(height) = self.caches.block_height.get(&()) {
            return Ok(height);
        }

        let height = self
            .with_retry("eth_blockNumber", || self.transport.block_number())
            .await?;
        self.caches.block_height.set((), height);

        logger::verbose(LogTag::Rpc, &format!("Block height {}", height));
        Ok(height)
    }

    /// Execute a read-only contract call and decode its single return value
    pub async fn read_contract(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> RpcResult<ContractValue> {
        let data = call.encode();
        let raw = self
            .with_retry("eth_call", || self.transport.call(contract, data.clone()))
            .await?;

        call.decode(&raw).map_err(|e| {
            logger::debug(
                LogTag::Rpc,
                &format!("{:?} {} decode failed: {}", contract, call.signature(), e),
            );
            e
        })
    }

    pub async fn supports_interface(
        &self,
        contract: Address,
        interface_id: [u8; 4],
    ) -> RpcResult<bool> {
        self.read_contract(contract, ContractCall::SupportsInterface(interface_id))
            .await?
            .into_bool()
    }

    pub async fn name(&self, contract: Address) -> RpcResult<String> {
        self.read_contract(contract, ContractCall::Name).await?.into_text()
    }

    pub async fn symbol(&self, contract: Address) -> RpcResult<String> {
        self.read_contract(contract, ContractCall::Symbol).await?.into_text()
    }

    pub async fn total_supply(&self, contract: Address) -> RpcResult<U256> {
        self.read_contract(contract, ContractCall::TotalSupply)
            .await?
            .into_uint()
    }

    pub async fn token_uri(&self, contract: Address, token_id: U256) -> RpcResult<String> {
        self.read_contract(contract, ContractCall::TokenUri(token_id))
            .await?
            .into_text()
    }

    pub async fn balance_of(&self, contract: Address, owner: Address) -> RpcResult<U256> {
        self.read_contract(contract, ContractCall::BalanceOf(owner))
            .await?
            .into_uint()
    }

    /// Mint-filtered Transfer logs, range clamped to `max_log_block_range`
    pub async fn query_mint_logs(&self, from_block: u64, to_block: u64) -> RpcResult<Vec<Log>> {
        let (from, to) = clamp_block_range(from_block, to_block, self.max_log_block_range);
        if from != from_block {
            logger::debug(
                LogTag::Rpc,
                &format!(
                    "Log window {}..{} narrowed to {}..{} ({} block cap)",
                    from_block, to_block, from, to, self.max_log_block_range
                ),
            );
        }

        let filter = mint_filter(from, to);
        self.with_retry("eth_getLogs", || self.transport.logs(&filter))
            .await
    }

    async fn with_retry<T, F, Fut>(&self, method: &'static str, mut op: F) -> RpcResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RpcResult<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            self.stats.lock().total_requests += 1;

            let outcome = match tokio::time::timeout(self.policy.timeout, op()).await {
                Ok(result) => result,
                Err(_) => {
                    self.stats.lock().timeouts += 1;
                    Err(RpcError::Timeout {
                        method,
                        timeout_ms: self.policy.timeout.as_millis() as u64,
                    })
                }
            };

            match outcome {
                Ok(value) => {
                    self.stats.lock().successful_requests += 1;
                    return Ok(value);
                }
                Err(e) => {
                    self.stats.lock().failed_requests += 1;

                    if attempt >= self.policy.retry_count {
                        logger::debug(
                            LogTag::Rpc,
                            &format!("{} failed after {} attempts: {}", method, attempt + 1, e),
                        );
                        return Err(e);
                    }

                    attempt += 1;
                    self.stats.lock().retries += 1;
                    logger::debug(
                        LogTag::Rpc,
                        &format!(
                            "{} attempt {} failed: {} (retrying in {}ms)",
                            method,
                            attempt,
                            e,
                            self.policy.retry_delay.as_millis()
                        ),
                    );
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
            }
        }
    }
}
