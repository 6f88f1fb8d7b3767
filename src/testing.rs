//! In-crate test doubles: a scripted RPC transport and a metadata source

use crate::config::RpcConfig;
use crate::constants::{ERC721_INTERFACE_ID, TRANSFER_EVENT_TOPIC};
use crate::processor::MetadataSource;
use crate::rpc::abi::{encode_return, ContractCall};
use crate::rpc::{EvmTransport, RpcError, RpcResult};
use crate::types::{MintEvent, NftMetadata};
use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, Bytes, Filter, Log, H256, U256, U64};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// RPC config with a 1ms retry delay so failure paths stay fast
pub fn test_rpc_config() -> RpcConfig {
    RpcConfig {
        url: "http://127.0.0.1:8545".to_string(),
        retry_delay_ms: 1,
        ..RpcConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Value(Bytes),
    Revert,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub contract: Address,
    pub selector: [u8; 4],
    /// Full calldata, selector included
    pub data: Bytes,
    pub started_at: Instant,
}

impl RecordedCall {
    /// First ABI word after the selector, read as a uint256
    pub fn first_uint_arg(&self) -> Option<U256> {
        self.data.get(4..36).map(U256::from_big_endian)
    }
}

pub struct MockTransport {
    block_height: Mutex<Option<u64>>,
    logs: Mutex<Option<Vec<Log>>>,
    replies: Mutex<HashMap<(Address, [u8; 4]), Reply>>,
    call_delay: Duration,
    failures_left: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
    log_queries: Mutex<Vec<Filter>>,
    block_number_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new(block_height: u64) -> Self {
        Self {
            block_height: Mutex::new(Some(block_height)),
            logs: Mutex::new(Some(Vec::new())),
            replies: Mutex::new(HashMap::new()),
            call_delay: Duration::ZERO,
            failures_left: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            log_queries: Mutex::new(Vec::new()),
            block_number_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every eth_call sleeps this long before answering
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// `None` makes eth_blockNumber fail
    pub fn set_block_height(&self, height: Option<u64>) {
        *self.block_height.lock() = height;
    }

    /// `None` makes eth_getLogs fail
    pub fn set_logs(&self, logs: Option<Vec<Log>>) {
        *self.logs.lock() = logs;
    }

    pub fn set_reply(&self, contract: Address, call: ContractCall, token: Token) {
        self.replies
            .lock()
            .insert((contract, call.selector()), Reply::Value(encode_return(token)));
    }

    pub fn set_revert(&self, contract: Address, call: ContractCall) {
        self.replies
            .lock()
            .insert((contract, call.selector()), Reply::Revert);
    }

    /// Register a well-behaved ERC-721 contract
    pub fn add_erc721(
        &self,
        contract: Address,
        name: &str,
        symbol: &str,
        supply: u64,
        token_uri: &str,
    ) {
        self.set_reply(
            contract,
            ContractCall::SupportsInterface(ERC721_INTERFACE_ID),
            Token::Bool(true),
        );
        self.set_reply(contract, ContractCall::Name, Token::String(name.to_string()));
        self.set_reply(contract, ContractCall::Symbol, Token::String(symbol.to_string()));
        self.set_reply(contract, ContractCall::TotalSupply, Token::Uint(U256::from(supply)));
        self.set_reply(
            contract,
            ContractCall::TokenUri(U256::zero()),
            Token::String(token_uri.to_string()),
        );
    }

    /// The next `n` eth_call requests fail before reaching the reply table
    pub fn fail_next_calls(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Calls made with the given function selector
    pub fn calls_with(&self, call: ContractCall) -> Vec<RecordedCall> {
        let selector = call.selector();
        self.calls()
            .into_iter()
            .filter(|c| c.selector == selector)
            .collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn block_number_calls(&self) -> usize {
        self.block_number_calls.load(Ordering::SeqCst)
    }

    pub fn log_queries(&self) -> Vec<Filter> {
        self.log_queries.lock().clone()
    }
}

#[async_trait]
impl EvmTransport for MockTransport {
    async fn block_number(&self) -> RpcResult<u64> {
        self.block_number_calls.fetch_add(1, Ordering::SeqCst);
        let height = *self.block_height.lock();
        height.ok_or_else(|| RpcError::request_failed("eth_blockNumber", "node unavailable"))
    }

    async fn call(&self, to: Address, data: Bytes) -> RpcResult<Bytes> {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);

        self.calls.lock().push(RecordedCall {
            contract: to,
            selector,
            data: data.clone(),
            started_at: Instant::now(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(RpcError::request_failed("eth_call", "connection reset"));
        }

        let reply = self.replies.lock().get(&(to, selector)).cloned();
        match reply {
            Some(Reply::Value(bytes)) => Ok(bytes),
            Some(Reply::Revert) | None => {
                Err(RpcError::request_failed("eth_call", "execution reverted"))
            }
        }
    }

    async fn logs(&self, filter: &Filter) -> RpcResult<Vec<Log>> {
        self.log_queries.lock().push(filter.clone());
        let logs = self.logs.lock().clone();
        logs.ok_or_else(|| {
            RpcError::request_failed("eth_getLogs", "query returned more than 10000 results")
        })
    }
}

fn word(bytes: &[u8]) -> H256 {
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    H256(out)
}

/// Raw ERC-721 mint log as a node would return it
pub fn mint_log(contract: Address, to: Address, token_id: u64, block: u64, log_index: u64) -> Log {
    let mut id_bytes = [0u8; 32];
    U256::from(token_id).to_big_endian(&mut id_bytes);

    Log {
        address: contract,
        topics: vec![
            H256::from_str(TRANSFER_EVENT_TOPIC).unwrap(),
            H256::zero(),
            word(to.as_bytes()),
            H256(id_bytes),
        ],
        data: Bytes::default(),
        block_number: Some(U64::from(block)),
        transaction_hash: Some(H256::from_low_u64_be(block * 1_000 + log_index)),
        log_index: Some(U256::from(log_index)),
        ..Default::default()
    }
}

/// Decoded mint event, for tests that start after the scanner
pub fn mint_event(contract: Address, token_id: u64, block: u64) -> MintEvent {
    MintEvent {
        contract_address: contract,
        minter: Address::repeat_byte(0xee),
        token_id: U256::from(token_id),
        block_number: block,
        transaction_hash: H256::from_low_u64_be(block),
        log_index: 0,
    }
}

/// Metadata source answering from a fixed table
#[derive(Default)]
pub struct MockMetadata {
    documents: Mutex<HashMap<String, NftMetadata>>,
    requests: Mutex<Vec<String>>,
}

impl MockMetadata {
    pub fn insert(&self, uri: &str, metadata: NftMetadata) {
        self.documents.lock().insert(uri.to_string(), metadata);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MetadataSource for MockMetadata {
    async fn fetch_metadata(&self, token_uri: &str) -> Option<NftMetadata> {
        self.requests.lock().push(token_uri.to_string());
        self.documents.lock().get(token_uri).cloned()
    }
}

pub fn sample_metadata(image: &str) -> NftMetadata {
    NftMetadata {
        name: "Genesis #1".to_string(),
        description: "First of the drop".to_string(),
        image: image.to_string(),
        attributes: Vec::new(),
    }
}
