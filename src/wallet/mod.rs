//! Wallet ownership checker
//!
//! Answers "which of these contracts does this wallet hold at least one token
//! of" with `balanceOf` queries, a fixed number in flight per batch.

use crate::errors::{ScoutError, ScoutResult};
use crate::logger::{self, LogTag};
use crate::rpc::ChainReader;
use crate::utils::run_in_batches;
use ethers::types::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use std::sync::Arc;

static WALLET_ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("Invalid wallet address regex"));

/// Validate and parse user-supplied wallet input (`0x` followed by 40 hex chars)
pub fn parse_wallet_address(input: &str) -> ScoutResult<Address> {
    let trimmed = input.trim();
    if !WALLET_ADDRESS_PATTERN.is_match(trimmed) {
        return Err(ScoutError::InvalidAddress(input.to_string()));
    }

    Address::from_str(trimmed).map_err(|_| ScoutError::InvalidAddress(input.to_string()))
}

pub struct WalletChecker {
    reader: Arc<ChainReader>,
    default_concurrency: usize,
}

impl WalletChecker {
    pub fn new(reader: Arc<ChainReader>, default_concurrency: usize) -> Self {
        Self {
            reader,
            default_concurrency: default_concurrency.max(1),
        }
    }

    /// Candidates with `balanceOf(wallet) > 0`, in candidate order
    ///
    /// A failed query only excludes its own contract.
    pub async fn check_ownership(
        &self,
        wallet: Address,
        candidates: &[Address],
        concurrency: usize,
    ) -> Vec<Address> {
        let balances = run_in_batches(candidates, concurrency.max(1), |contract| async move {
            match self.reader.balance_of(*contract, wallet).await {
                Ok(balance) => !balance.is_zero(),
                Err(e) => {
                    logger::debug(
                        LogTag::Wallet,
                        &format!("balanceOf on {:?} failed, treating as not held: {}", contract, e),
                    );
                    false
                }
            }
        })
        .await;

        let owned: Vec<Address> = candidates
            .iter()
            .zip(balances)
            .filter_map(|(contract, held)| held.then_some(*contract))
            .collect();

        logger::info(
            LogTag::Wallet,
            &format!(
                "Wallet {:?} holds {} of {} candidate collections",
                wallet,
                owned.len(),
                candidates.len()
            ),
        );

        owned
    }

    /// `check_ownership` with the configured concurrency
    pub async fn check(&self, wallet: Address, candidates: &[Address]) -> Vec<Address> {
        self.check_ownership(wallet, candidates, self.default_concurrency)
            .await
    }
}
