//! Raw JSON-RPC access: the seam between mintscout and the network
//!
//! `EvmTransport` covers exactly the three methods the scanner needs
//! (`eth_blockNumber`, `eth_call`, `eth_getLogs`). Timeouts, retries and
//! decoding live one level up in `ChainReader`.

use super::types::{RpcError, RpcResult};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Filter, Log, TransactionRequest};

#[async_trait]
pub trait EvmTransport: Send + Sync {
    /// `eth_blockNumber`
    async fn block_number(&self) -> RpcResult<u64>;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Bytes) -> RpcResult<Bytes>;

    /// `eth_getLogs`
    async fn logs(&self, filter: &Filter) -> RpcResult<Vec<Log>>;
}

/// HTTP JSON-RPC transport backed by an ethers `Provider`
pub struct HttpTransport {
    provider: Provider<Http>,
    url: String,
}

impl HttpTransport {
    pub fn new(url: &str) -> RpcResult<Self> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| {
                RpcError::ConfigurationError(format!("Invalid RPC url '{}': {}", url, e))
            })?;

        Ok(Self {
            provider,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EvmTransport for HttpTransport {
    async fn block_number(&self) -> RpcResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map(|n| n.as_u64())
            .map_err(|e| RpcError::request_failed("eth_blockNumber", e))
    }

    async fn call(&self, to: Address, data: Bytes) -> RpcResult<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.provider
            .call(&tx, None)
            .await
            .map_err(|e| RpcError::request_failed("eth_call", e))
    }

    async fn logs(&self, filter: &Filter) -> RpcResult<Vec<Log>> {
        self.provider
            .get_logs(filter)
            .await
            .map_err(|e| RpcError::request_failed("eth_getLogs", e))
    }
}
