/// Core data model shared across the scanning pipeline
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// A Transfer from the zero address, decoded from one log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    pub contract_address: Address,
    /// Recipient of the mint (the log's `to` topic)
    pub minter: Address,
    pub token_id: U256,
    pub block_number: u64,
    pub transaction_hash: H256,
    /// Position of the log in its block, last-resort ordering key
    pub log_index: u64,
}

impl MintEvent {
    /// Ordering key for "latest mint": block, then token id, then log index
    pub fn recency_key(&self) -> (u64, U256, u64) {
        (self.block_number, self.token_id, self.log_index)
    }
}

/// One `{ trait_type, value }` pair from a metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Token metadata document, normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    /// Resolved HTTP(S) image URL, empty when the document has none
    pub image: String,
    pub attributes: Vec<NftAttribute>,
}

impl NftMetadata {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Descriptive contract fields, each already degraded to its default on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFields {
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
}

/// Normalized view of a freshly minted ERC-721 contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftContractRecord {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
    pub last_minted_token_id: U256,
    pub last_minter: Address,
    pub mint_block: u64,
    pub metadata: Option<NftMetadata>,
    pub is_verified: bool,
}
