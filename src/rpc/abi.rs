//! ERC-721 read calls: selector, argument encoding and return decoding

use super::types::{RpcError, RpcResult};
use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::id;

/// Read-only ERC-721 / ERC-165 functions used by mintscout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    SupportsInterface([u8; 4]),
    Name,
    Symbol,
    TotalSupply,
    TokenUri(U256),
    BalanceOf(Address),
}

/// Decoded return value of a `ContractCall`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractValue {
    Bool(bool),
    Text(String),
    Uint(U256),
}

impl ContractCall {
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::SupportsInterface(_) => "supportsInterface(bytes4)",
            ContractCall::Name => "name()",
            ContractCall::Symbol => "symbol()",
            ContractCall::TotalSupply => "totalSupply()",
            ContractCall::TokenUri(_) => "tokenURI(uint256)",
            ContractCall::BalanceOf(_) => "balanceOf(address)",
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        id(self.signature())
    }

    fn args(&self) -> Vec<Token> {
        match self {
            ContractCall::SupportsInterface(interface_id) => {
                vec![Token::FixedBytes(interface_id.to_vec())]
            }
            ContractCall::TokenUri(token_id) => vec![Token::Uint(*token_id)],
            ContractCall::BalanceOf(owner) => vec![Token::Address(*owner)],
            ContractCall::Name | ContractCall::Symbol | ContractCall::TotalSupply => Vec::new(),
        }
    }

    fn output(&self) -> ParamType {
        match self {
            ContractCall::SupportsInterface(_) => ParamType::Bool,
            ContractCall::Name | ContractCall::Symbol | ContractCall::TokenUri(_) => {
                ParamType::String
            }
            ContractCall::TotalSupply | ContractCall::BalanceOf(_) => ParamType::Uint(256),
        }
    }

    /// Calldata: 4-byte selector followed by the ABI-encoded arguments
    pub fn encode(&self) -> Bytes {
        let mut data = self.selector().to_vec();
        data.extend(abi::encode(&self.args()));
        Bytes::from(data)
    }

    /// Decode `eth_call` return data for this call
    pub fn decode(&self, raw: &[u8]) -> RpcResult<ContractValue> {
        if raw.is_empty() {
            return Err(RpcError::invalid_response(
                "eth_call",
                format!("{} returned no data", self.signature()),
            ));
        }

        let tokens = abi::decode(&[self.output()], raw).map_err(|e| {
            RpcError::invalid_response("eth_call", format!("{}: {}", self.signature(), e))
        })?;

        match tokens.into_iter().next() {
            Some(Token::Bool(value)) => Ok(ContractValue::Bool(value)),
            Some(Token::String(value)) => Ok(ContractValue::Text(value)),
            Some(Token::Uint(value)) => Ok(ContractValue::Uint(value)),
            other => Err(RpcError::invalid_response(
                "eth_call",
                format!("{}: unexpected output {:?}", self.signature(), other),
            )),
        }
    }
}

impl ContractValue {
    pub fn into_bool(self) -> RpcResult<bool> {
        match self {
            ContractValue::Bool(value) => Ok(value),
            other => Err(mismatch("bool", &other)),
        }
    }

    pub fn into_text(self) -> RpcResult<String> {
        match self {
            ContractValue::Text(value) => Ok(value),
            other => Err(mismatch("string", &other)),
        }
    }

    pub fn into_uint(self) -> RpcResult<U256> {
        match self {
            ContractValue::Uint(value) => Ok(value),
            other => Err(mismatch("uint256", &other)),
        }
    }
}

fn mismatch(expected: &str, got: &ContractValue) -> RpcError {
    RpcError::invalid_response("eth_call", format!("expected {}, got {:?}", expected, got))
}

/// ABI-encode a single return value, the shape `eth_call` hands back
pub fn encode_return(token: Token) -> Bytes {
    Bytes::from(abi::encode(&[token]))
}
