//! Contract processor: turns grouped mint events into verified contract records
//!
//! Per contract: ERC-721 check, then descriptive fields, then metadata of the
//! latest minted token. Only the interface check can drop a contract; every
//! other failure degrades to a default value.

pub mod metadata;

pub use metadata::{
    decode_data_uri, parse_metadata, resolve_ipfs, HttpMetadataFetcher, MetadataSource,
};

use crate::cache::ScoutCaches;
use crate::config::ProcessorConfig;
use crate::constants::{ERC721_INTERFACE_ID, UNKNOWN_NAME, UNKNOWN_SYMBOL};
use crate::errors::SkipReason;
use crate::logger::{self, LogTag};
use crate::rpc::ChainReader;
use crate::scanner::{group_by_contract, ContractMints};
use crate::types::{ContractFields, MintEvent, NftContractRecord, NftMetadata};
use crate::utils::run_in_batches;
use ethers::types::{Address, U256};
use std::sync::Arc;
use std::time::Instant;

pub struct ContractProcessor {
    reader: Arc<ChainReader>,
    metadata: Arc<dyn MetadataSource>,
    caches: Arc<ScoutCaches>,
    batch_size: usize,
}

impl ContractProcessor {
    pub fn new(
        reader: Arc<ChainReader>,
        metadata: Arc<dyn MetadataSource>,
        caches: Arc<ScoutCaches>,
        config: &ProcessorConfig,
    ) -> Self {
        Self {
            reader,
            metadata,
            caches,
            batch_size: config.batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Build one record per verified contract, in first-seen contract order
    pub async fn process_contracts(&self, events: &[MintEvent]) -> Vec<NftContractRecord> {
        let started = Instant::now();
        let groups = group_by_contract(events);

        let outcomes = run_in_batches(&groups, self.batch_size, |group| {
            self.process_contract(group)
        })
        .await;

        let mut records = Vec::with_capacity(outcomes.len());
        for (group, outcome) in groups.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(reason) => logger::debug(
                    LogTag::Processor,
                    &format!("Skipped {:?} [{}]: {}", group.address, reason.label(), reason),
                ),
            }
        }

        logger::info(
            LogTag::Processor,
            &format!(
                "Processed {} contracts: {} verified, {} skipped in {}ms",
                groups.len(),
                records.len(),
                groups.len() - records.len(),
                started.elapsed().as_millis()
            ),
        );

        records
    }

    /// Process a single contract group
    pub async fn process_contract(
        &self,
        group: &ContractMints,
    ) -> Result<NftContractRecord, SkipReason> {
        let latest = group.latest().ok_or(SkipReason::NoMintEvents)?;

        self.verify_erc721(group.address).await?;

        let fields = self.contract_fields(group.address).await;
        let metadata = self.token_metadata(group.address, latest.token_id).await;

        Ok(NftContractRecord {
            address: group.address,
            name: fields.name,
            symbol: fields.symbol,
            total_supply: fields.total_supply,
            last_minted_token_id: latest.token_id,
            last_minter: latest.minter,
            mint_block: latest.block_number,
            metadata,
            is_verified: true,
        })
    }

    /// `supportsInterface(0x80ac58cd)`; definite answers are cached, failures are not
    pub async fn verify_erc721(&self, contract: Address) -> Result<(), SkipReason> {
        let supported = match self.caches.interface_checks.get(&contract) {
            Some(supported) => supported,
            None => {
                let supported = self
                    .reader
                    .supports_interface(contract, ERC721_INTERFACE_ID)
                    .await
                    .map_err(|e| SkipReason::InterfaceCheckFailed(e.to_string()))?;
                self.caches.interface_checks.set(contract, supported);
                supported
            }
        };

        if supported {
            Ok(())
        } else {
            Err(SkipReason::NotErc721)
        }
    }

    /// name / symbol / totalSupply read concurrently, each defaulted on failure
    pub async fn contract_fields(&self, contract: Address) -> ContractFields {
        if let Some(fields) = self.caches.contract_fields.get(&contract) {
            return fields;
        }

        let (name, symbol, total_supply) = tokio::join!(
            self.reader.name(contract),
            self.reader.symbol(contract),
            self.reader.total_supply(contract)
        );

        if name.is_err() || symbol.is_err() || total_supply.is_err() {
            logger::debug(
                LogTag::Processor,
                &format!("{:?}: some contract fields unavailable, using defaults", contract),
            );
        }

        let fields = ContractFields {
            name: name.unwrap_or_else(|_| UNKNOWN_NAME.to_string()),
            symbol: symbol.unwrap_or_else(|_| UNKNOWN_SYMBOL.to_string()),
            total_supply: total_supply.unwrap_or_default(),
        };

        self.caches.contract_fields.set(contract, fields.clone());
        fields
    }

    async fn token_metadata(&self, contract: Address, token_id: U256) -> Option<NftMetadata> {
        let token_uri = match self.reader.token_uri(contract, token_id).await {
            Ok(uri) => uri,
            Err(e) => {
                logger::debug(
                    LogTag::Metadata,
                    &format!("{:?} tokenURI({}) unavailable: {}", contract, token_id, e),
                );
                return None;
            }
        };

        if let Some(metadata) = self.caches.metadata.get(&token_uri) {
            return Some(metadata);
        }

        let metadata = self.metadata.fetch_metadata(&token_uri).await?;
        self.caches.metadata.set(token_uri, metadata.clone());
        Some(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::ContractCall;
    use crate::testing::{mint_event, sample_metadata, test_rpc_config, MockMetadata, MockTransport};
    use ethers::abi::Token;
    use std::time::Duration;

    struct Harness {
        mock: Arc<MockTransport>,
        metadata: Arc<MockMetadata>,
        processor: ContractProcessor,
    }

    fn harness(mock: MockTransport, batch_size: usize) -> Harness {
        let mock = Arc::new(mock);
        let metadata = Arc::new(MockMetadata::default());
        let caches = Arc::new(ScoutCaches::with_defaults());
        let reader = Arc::new(ChainReader::new(mock.clone(), caches.clone(), &test_rpc_config()));
        let config = ProcessorConfig {
            batch_size,
            ..ProcessorConfig::default()
        };

        Harness {
            processor: ContractProcessor::new(reader, metadata.clone(), caches, &config),
            mock,
            metadata,
        }
    }

    #[tokio::test]
    async fn test_builds_record_from_latest_mint() {
        let h = harness(MockTransport::new(1_000), 5);
        let a = Address::repeat_byte(0xa1);
        h.mock.add_erc721(a, "Based Frogs", "FROG", 42, "ipfs://QmFrog/9");
        h.metadata.insert("ipfs://QmFrog/9", sample_metadata("https://img/frog.png"));

        let events = vec![mint_event(a, 8, 990), mint_event(a, 9, 995), mint_event(a, 7, 991)];
        let records = h.processor.process_contracts(&events).await;

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "Based Frogs");
        assert_eq!(record.symbol, "FROG");
        assert_eq!(record.total_supply, U256::from(42));
        assert_eq!(record.last_minted_token_id, U256::from(9));
        assert_eq!(record.mint_block, 995);
        assert_eq!(record.last_minter, Address::repeat_byte(0xee));
        assert!(record.is_verified);
        assert_eq!(record.metadata.as_ref().unwrap().image, "https://img/frog.png");

        let uri_calls = h.mock.calls_with(ContractCall::TokenUri(U256::zero()));
        assert_eq!(uri_calls.len(), 1);
        assert_eq!(uri_calls[0].first_uint_arg(), Some(U256::from(9)));
    }

    #[tokio::test]
    async fn test_non_erc721_contracts_are_dropped() {
        let h = harness(MockTransport::new(1_000), 5);
        let good = Address::repeat_byte(0x01);
        let erc1155 = Address::repeat_byte(0x02);
        let broken = Address::repeat_byte(0x03);

        h.mock.add_erc721(good, "Good", "GD", 1, "ipfs://good");
        h.mock.set_reply(
            erc1155,
            ContractCall::SupportsInterface(ERC721_INTERFACE_ID),
            Token::Bool(false),
        );
        h.mock
            .set_revert(broken, ContractCall::SupportsInterface(ERC721_INTERFACE_ID));

        let events = vec![
            mint_event(erc1155, 1, 900),
            mint_event(good, 1, 901),
            mint_event(broken, 1, 902),
        ];
        let records = h.processor.process_contracts(&events).await;

        assert_eq!(records.len(), 1);
        assert!(records.len() < 3);
        assert_eq!(records[0].address, good);
    }

    #[tokio::test]
    async fn test_skip_reasons() {
        let h = harness(MockTransport::new(1_000), 5);
        let erc20 = Address::repeat_byte(0x04);
        h.mock.set_reply(
            erc20,
            ContractCall::SupportsInterface(ERC721_INTERFACE_ID),
            Token::Bool(false),
        );

        let group = ContractMints {
            address: erc20,
            events: vec![mint_event(erc20, 1, 900)],
        };
        assert_eq!(
            h.processor.process_contract(&group).await.unwrap_err(),
            SkipReason::NotErc721
        );

        let empty = ContractMints {
            address: erc20,
            events: Vec::new(),
        };
        assert_eq!(
            h.processor.process_contract(&empty).await.unwrap_err(),
            SkipReason::NoMintEvents
        );

        let unknown = ContractMints {
            address: Address::repeat_byte(0x05),
            events: vec![mint_event(Address::repeat_byte(0x05), 1, 900)],
        };
        assert!(matches!(
            h.processor.process_contract(&unknown).await.unwrap_err(),
            SkipReason::InterfaceCheckFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_field_failures_degrade_to_defaults() {
        let h = harness(MockTransport::new(1_000), 5);
        let a = Address::repeat_byte(0x06);
        h.mock.set_reply(
            a,
            ContractCall::SupportsInterface(ERC721_INTERFACE_ID),
            Token::Bool(true),
        );
        h.mock.set_reply(a, ContractCall::Symbol, Token::String("SYM".into()));

        let records = h.processor.process_contracts(&[mint_event(a, 3, 950)]).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, UNKNOWN_NAME);
        assert_eq!(records[0].symbol, "SYM");
        assert_eq!(records[0].total_supply, U256::zero());
        assert!(records[0].metadata.is_none());
        assert!(h.metadata.requests().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_failure_keeps_record() {
        let h = harness(MockTransport::new(1_000), 5);
        let a = Address::repeat_byte(0x07);
        h.mock.add_erc721(a, "No Meta", "NM", 5, "https://gone.example/1");

        let records = h.processor.process_contracts(&[mint_event(a, 1, 950)]).await;

        assert_eq!(records.len(), 1);
        assert!(records[0].metadata.is_none());
        assert_eq!(h.metadata.requests(), vec!["https://gone.example/1".to_string()]);
    }

    #[tokio::test]
    async fn test_second_cycle_is_served_from_cache() {
        let h = harness(MockTransport::new(1_000), 5);
        let a = Address::repeat_byte(0x08);
        h.mock.add_erc721(a, "Cached", "CCH", 10, "ipfs://cached");
        h.metadata.insert("ipfs://cached", sample_metadata(""));

        let events = vec![mint_event(a, 1, 950)];
        let first = h.processor.process_contracts(&events).await;
        let second = h.processor.process_contracts(&events).await;

        assert_eq!(first, second);
        assert_eq!(
            h.mock
                .calls_with(ContractCall::SupportsInterface(ERC721_INTERFACE_ID))
                .len(),
            1
        );
        assert_eq!(h.mock.calls_with(ContractCall::Name).len(), 1);
        assert_eq!(h.metadata.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_interface_check_is_not_cached() {
        let h = harness(MockTransport::new(1_000), 5);
        let a = Address::repeat_byte(0x09);
        h.mock.add_erc721(a, "Flaky", "FLK", 1, "ipfs://flaky");
        h.mock.fail_next_calls(3);

        assert!(h.processor.verify_erc721(a).await.is_err());
        assert!(h.processor.verify_erc721(a).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_contracts_run_in_sequential_batches() {
        let h = harness(MockTransport::new(1_000).with_call_delay(Duration::from_millis(20)), 3);
        let contracts: Vec<Address> = (1..=7u8).map(Address::repeat_byte).collect();
        for contract in &contracts {
            h.mock.add_erc721(*contract, "Batch", "BT", 1, "ipfs://batch");
        }

        let events: Vec<MintEvent> = contracts.iter().map(|c| mint_event(*c, 1, 990)).collect();
        let records = h.processor.process_contracts(&events).await;

        assert_eq!(records.len(), 7);
        assert_eq!(
            records.iter().map(|r| r.address).collect::<Vec<_>>(),
            contracts
        );

        let checks = h
            .mock
            .calls_with(ContractCall::SupportsInterface(ERC721_INTERFACE_ID));
        let mut batch_sizes: Vec<usize> = Vec::new();
        let mut last_start = None;
        for call in &checks {
            if Some(call.started_at) == last_start {
                *batch_sizes.last_mut().unwrap() += 1;
            } else {
                batch_sizes.push(1);
                last_start = Some(call.started_at);
            }
        }
        assert_eq!(batch_sizes, vec![3, 3, 1]);
        assert!(h.mock.peak_in_flight() <= 3 * 3);
    }
}
