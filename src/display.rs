//! Terminal rendering of discovery and wallet reports
use crate::scout::{DiscoveryReport, RankedContract, WalletReport};
use crate::score::ScoreTier;
use crate::utils::short_address;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, ContentArrangement, Table};

fn tier_color(tier: ScoreTier) -> Color {
    match tier {
        ScoreTier::Hot => Color::Green,
        ScoreTier::Warm => Color::Yellow,
        ScoreTier::Mild => Color::DarkYellow,
        ScoreTier::Cold => Color::Grey,
    }
}

fn contracts_table(entries: &[RankedContract]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Collection").add_attribute(Attribute::Bold),
        Cell::new("Contract").add_attribute(Attribute::Bold),
        Cell::new("Supply").add_attribute(Attribute::Bold),
        Cell::new("Mints").add_attribute(Attribute::Bold),
        Cell::new("Block").add_attribute(Attribute::Bold),
        Cell::new("Why").add_attribute(Attribute::Bold),
    ]);

    for entry in entries {
        let tier = entry.score.tier();
        table.add_row(vec![
            Cell::new(format!("{} {}", entry.score.score, tier)).fg(tier_color(tier)),
            Cell::new(format!("{} ({})", entry.contract.name, entry.contract.symbol)),
            Cell::new(short_address(&format!("{:?}", entry.contract.address))),
            Cell::new(entry.contract.total_supply.to_string()),
            Cell::new(entry.recent_mint_count),
            Cell::new(entry.contract.mint_block),
            Cell::new(entry.score.reasons.join("\n")),
        ]);
    }

    table
}

pub fn render_discovery(report: &DiscoveryReport) -> String {
    let header = format!(
        "{} mints, {} verified collections in the last {} blocks ({})",
        report.mint_events,
        report.contracts.len(),
        report.block_range,
        report.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if report.is_empty() {
        return format!("{}\nNo new collections found.", header);
    }

    format!("{}\n{}", header, contracts_table(&report.ranked()))
}

pub fn render_wallet(report: &WalletReport) -> String {
    let header = format!(
        "Wallet {:?}: holds {} of {} collections minted in the last {} blocks",
        report.wallet,
        report.owned.len(),
        report.candidates,
        report.block_range
    );

    if report.owned.is_empty() {
        return header;
    }

    format!("{}\n{}", header, contracts_table(&report.owned))
}
