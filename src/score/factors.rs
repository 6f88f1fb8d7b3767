/// Individual score factors, each worth 0..=20 points
use ethers::types::U256;

/// Points and optional reason for one factor
pub type FactorScore = (u8, Option<String>);

const SUPPLY_TIERS: [(u64, u8, &str); 4] = [
    (100, 20, "Ultra early: < 100 mints"),
    (500, 15, "Very early: < 500 mints"),
    (1_000, 10, "Early: < 1,000 mints"),
    (5_000, 5, "Growing: < 5,000 mints"),
];

const RECENCY_TIERS: [(u64, u8); 4] = [(50, 20), (100, 15), (200, 10), (500, 5)];

const VELOCITY_TIERS: [(usize, u8, &str); 3] = [
    (10, 20, "High velocity: 10+ mints"),
    (5, 15, "Good velocity: 5+ mints"),
    (2, 10, "Steady velocity: 2+ mints"),
];

pub fn supply_score(total_supply: U256) -> FactorScore {
    SUPPLY_TIERS
        .iter()
        .find(|(limit, _, _)| total_supply < U256::from(*limit))
        .map(|(_, points, reason)| (*points, Some(reason.to_string())))
        .unwrap_or((0, None))
}

/// `current_block = None` means the height read failed: no points, no reason
pub fn recency_score(mint_block: u64, current_block: Option<u64>) -> FactorScore {
    let Some(current) = current_block else {
        return (0, None);
    };

    // A cached height can trail a freshly seen mint; treat that as zero blocks ago
    let blocks_since_mint = current.saturating_sub(mint_block);

    RECENCY_TIERS
        .iter()
        .find(|(limit, _)| blocks_since_mint < *limit)
        .map(|(limit, points)| (*points, Some(format!("Minted in last {} blocks", limit))))
        .unwrap_or((0, None))
}

pub fn velocity_score(recent_mint_count: usize) -> FactorScore {
    VELOCITY_TIERS
        .iter()
        .find(|(min, _, _)| recent_mint_count >= *min)
        .map(|(_, points, reason)| (*points, Some(reason.to_string())))
        .unwrap_or((0, None))
}

pub fn verification_score(is_verified: bool) -> FactorScore {
    if is_verified {
        (20, Some("ERC721 verified".to_string()))
    } else {
        (0, None)
    }
}

/// Metadata readiness: full marks with an image, half without
pub fn metadata_score(has_metadata: bool, has_image: bool) -> FactorScore {
    match (has_metadata, has_image) {
        (true, true) => (20, Some("Metadata ready".to_string())),
        (true, false) => (10, Some("Partial metadata".to_string())),
        _ => (0, None),
    }
}
