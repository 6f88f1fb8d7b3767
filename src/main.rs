use anyhow::{Context, Result};
use mintscout::{
    arguments::{patterns, print_debug_info, print_help, CliOptions},
    config::{self, CONFIG_FILE_PATH},
    display,
    logger::{self as logger, LogLevel, LogTag},
    MintScout,
};

/// Main entry point for mintscout
///
/// - `--help`: usage and exit
/// - `--wallet <0x..>`: collections from the wallet window the wallet holds
/// - default: discovery over `--blocks` (or the configured range)
#[tokio::main]
async fn main() {
    logger::init();

    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    print_debug_info();

    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("{:#}", e));
        logger::flush();
        std::process::exit(1);
    }

    logger::flush();
}

async fn run() -> Result<()> {
    let options = CliOptions::parse().map_err(anyhow::Error::msg)?;

    // Keep stdout parseable
    if options.json {
        logger::update_logger_config(|cfg| cfg.min_level = LogLevel::Error);
    }

    let config_path = options.config_path.as_deref().unwrap_or(CONFIG_FILE_PATH);
    config::load_config_from_path(config_path).map_err(anyhow::Error::msg)?;
    let config = config::get_config_clone();

    logger::debug(
        LogTag::Config,
        &format!(
            "rpc={} timeout={}s retries={} batch={}",
            config.rpc.url,
            config.rpc.timeout_secs,
            config.rpc.retry_count,
            config.processor.batch_size
        ),
    );

    let scout = MintScout::new(&config).context("Failed to initialize scanner")?;

    if let Some(wallet) = options.wallet.as_deref() {
        let report = scout.scan_wallet(wallet).await?;
        if options.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", display::render_wallet(&report));
        }
        return Ok(());
    }

    let report = match options.block_range {
        Some(block_range) => scout.discover(block_range).await?,
        None => scout.discover_default().await?,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report.ranked())?);
    } else {
        println!("{}", display::render_discovery(&report));
    }

    let stats = scout.rpc_stats();
    logger::verbose(
        LogTag::Rpc,
        &format!(
            "{} requests, {:.0}% ok, {} retries, {} timeouts",
            stats.total_requests,
            stats.success_rate() * 100.0,
            stats.retries,
            stats.timeouts
        ),
    );

    Ok(())
}
