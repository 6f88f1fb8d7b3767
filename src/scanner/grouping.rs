//! Per-contract grouping of mint events

use crate::types::MintEvent;
use ethers::types::Address;
use std::collections::HashMap;

/// All mints of one contract seen in a scan, in log order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMints {
    pub address: Address,
    pub events: Vec<MintEvent>,
}

impl ContractMints {
    /// Latest mint: highest block, then highest token id, then highest log index
    ///
    /// Log order from the node is not trusted, so this does not take the last
    /// element.
    pub fn latest(&self) -> Option<&MintEvent> {
        self.events.iter().max_by_key(|event| event.recency_key())
    }

    pub fn mint_count(&self) -> usize {
        self.events.len()
    }
}

/// Group events by contract, keeping first-seen contract order
pub fn group_by_contract(events: &[MintEvent]) -> Vec<ContractMints> {
    let mut index: HashMap<Address, usize> = HashMap::new();
    let mut groups: Vec<ContractMints> = Vec::new();

    for event in events {
        match index.get(&event.contract_address) {
            Some(&slot) => groups[slot].events.push(event.clone()),
            None => {
                index.insert(event.contract_address, groups.len());
                groups.push(ContractMints {
                    address: event.contract_address,
                    events: vec![event.clone()],
                });
            }
        }
    }

    groups
}

/// Distinct contract addresses, first-seen order
pub fn unique_contracts(events: &[MintEvent]) -> Vec<Address> {
    group_by_contract(events)
        .into_iter()
        .map(|group| group.address)
        .collect()
}

/// Mint events per contract, the `recent_mint_count` fed to scoring
pub fn mint_counts(events: &[MintEvent]) -> HashMap<Address, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.contract_address).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mint_event;
    use ethers::types::U256;

    #[test]
    fn test_groups_keep_first_seen_order() {
        let a = Address::repeat_byte(0xa1);
        let b = Address::repeat_byte(0xb2);
        let events = vec![
            mint_event(b, 1, 100),
            mint_event(a, 7, 101),
            mint_event(b, 2, 102),
        ];

        let groups = group_by_contract(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].address, b);
        assert_eq!(groups[0].mint_count(), 2);
        assert_eq!(groups[1].address, a);
        assert_eq!(unique_contracts(&events), vec![b, a]);
    }

    #[test]
    fn test_latest_uses_block_not_position() {
        let a = Address::repeat_byte(0xa1);
        let events = vec![
            mint_event(a, 5, 210),
            mint_event(a, 9, 230),
            mint_event(a, 6, 220),
        ];

        let groups = group_by_contract(&events);
        let latest = groups[0].latest().unwrap();
        assert_eq!(latest.block_number, 230);
        assert_eq!(latest.token_id, U256::from(9));
    }

    #[test]
    fn test_latest_tie_breaks_on_token_id_then_log_index() {
        let a = Address::repeat_byte(0xa1);
        let mut first = mint_event(a, 12, 300);
        first.log_index = 4;
        let mut second = mint_event(a, 11, 300);
        second.log_index = 9;

        let groups = group_by_contract(&[first.clone(), second]);
        assert_eq!(groups[0].latest().unwrap().token_id, U256::from(12));

        let mut same_id = first.clone();
        same_id.log_index = 8;
        let groups = group_by_contract(&[same_id, first]);
        assert_eq!(groups[0].latest().unwrap().log_index, 8);
    }

    #[test]
    fn test_mint_counts() {
        let a = Address::repeat_byte(0xa1);
        let b = Address::repeat_byte(0xb2);
        let events = vec![mint_event(a, 1, 1), mint_event(a, 2, 1), mint_event(b, 1, 2)];

        let counts = mint_counts(&events);
        assert_eq!(counts[&a], 2);
        assert_eq!(counts[&b], 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_contract(&[]).is_empty());
        assert!(mint_counts(&[]).is_empty());
    }
}
