//! Agora command-line client.

mod output;

use std::ops::RangeInclusive;
use std::path::PathBuf;

use agora_dashboard::{Dashboard, DashboardConfig};
use agora_types::{Timestamp, TxHandle, VoteSupport};
use agora_utils::{init_logging, LogFormat};
use anyhow::{bail, Context};
use clap::Parser;

/// Environment variable holding the signing key. Never read from a file.
const PRIVATE_KEY_ENV: &str = "AGORA_PRIVATE_KEY";

/// Largest number of ledger ids one `scan` may query.
const MAX_SCAN_IDS: u64 = 10_000;

#[derive(Parser)]
#[command(name = "agora", about = "Governance proposals and on-chain voting")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Proposal backend base URL.
    #[arg(long, env = "AGORA_API_URL")]
    api_url: Option<String>,

    /// Ethereum JSON-RPC endpoint.
    #[arg(long, env = "AGORA_RPC_URL")]
    rpc_url: Option<String>,

    /// Governor contract address.
    #[arg(long, env = "AGORA_GOVERNOR")]
    governor: Option<String>,

    /// Directory for the persisted proposal snapshot.
    #[arg(long, env = "AGORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List proposals, marking the active one.
    Proposals,
    /// Show a single proposal.
    Show { id: String },
    /// Re-fetch the proposal list regardless of freshness.
    Refresh,
    /// Print the ledger id a dashboard id resolves to.
    Map { id: String },
    /// Check a proposal's on-chain state.
    Validate { id: String },
    /// Query a range of ledger ids for existing proposals.
    Scan {
        #[arg(long, default_value_t = 1)]
        from: u64,
        #[arg(long, default_value_t = 100)]
        to: u64,
        #[arg(long, default_value_t = 10)]
        batch: usize,
    },
    /// Cast a vote using the key in AGORA_PRIVATE_KEY.
    Vote {
        id: String,
        /// "for", "against" or "abstain".
        support: VoteSupport,
        #[arg(long)]
        reason: Option<String>,
        /// Wait for the transaction to be mined.
        #[arg(long)]
        wait: bool,
    },
    /// Wait for a submitted vote transaction to be mined.
    Wait { tx: TxHandle },
}

impl Cli {
    /// Flags and env vars layered over the file config (or defaults).
    fn resolve_config(&self) -> anyhow::Result<DashboardConfig> {
        let base = match &self.config {
            Some(path) => DashboardConfig::from_toml_file(&path.to_string_lossy())
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => DashboardConfig::default(),
        };

        Ok(DashboardConfig {
            api_url: self.api_url.clone().unwrap_or(base.api_url),
            rpc_url: self.rpc_url.clone().unwrap_or(base.rpc_url),
            governor_address: self.governor.clone().unwrap_or(base.governor_address),
            data_dir: self.data_dir.clone().unwrap_or(base.data_dir),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            ..base
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let dashboard = Dashboard::open(&config).context("opening dashboard")?;
    let outcome = run(&dashboard, cli.command).await;

    // Let a background refresh finish so its snapshot is persisted.
    dashboard.settle().await;
    dashboard.dispose();
    outcome
}

async fn run(dashboard: &Dashboard, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Proposals => {
            dashboard.initialize().await;
            print!("{}", output::listing(&dashboard.state(), Timestamp::now()));
        }
        Command::Show { id } => {
            dashboard.initialize().await;
            let proposal = dashboard
                .proposal(&id)
                .await
                .with_context(|| format!("proposal {id}"))?;
            print!("{}", output::details(&proposal));
        }
        Command::Refresh => {
            dashboard.refresh().await;
            dashboard.settle().await;
            let state = dashboard.state();
            println!("{} proposals", state.all_proposals.len());
            println!("{}", output::origin_line(&state, Timestamp::now()));
        }
        Command::Map { id } => {
            let mapper = dashboard.mapper();
            let mapped = mapper.map(&id);
            let how = if mapper.is_mapped(&id) {
                "explicit mapping"
            } else if mapped == id {
                "known on-chain id"
            } else {
                "fallback"
            };
            println!("{id} -> {mapped} ({how})");
        }
        Command::Validate { id } => {
            let report = dashboard.validate(&id).await;
            println!("{}", output::validation(&id, &report));
        }
        Command::Scan { from, to, batch } => {
            let report = dashboard.scan(scan_range(from, to)?, batch).await;
            print!("{}", output::scan_report(&report));
        }
        Command::Vote {
            id,
            support,
            reason,
            wait,
        } => {
            let key = std::env::var(PRIVATE_KEY_ENV)
                .with_context(|| format!("{PRIVATE_KEY_ENV} must hold the signing key"))?;
            let address = dashboard.connect_wallet(&key).await?;
            println!("voting {support} on {id} as {}", address.short());

            let mut result = dashboard.cast_vote(&id, support, reason.as_deref()).await;
            if wait {
                if let (true, Some(handle)) = (result.success, result.tx_handle) {
                    println!("{}", output::vote_result(&result));
                    result = dashboard.wait_for_transaction(handle).await;
                }
            }
            if !result.success {
                bail!("{}", result.message);
            }
            println!("{}", output::vote_result(&result));
        }
        Command::Wait { tx } => {
            let result = dashboard.wait_for_transaction(tx).await;
            if !result.success {
                bail!("{}", result.message);
            }
            println!("{}", output::vote_result(&result));
        }
    }
    Ok(())
}

fn scan_range(from: u64, to: u64) -> anyhow::Result<RangeInclusive<u64>> {
    if from > to {
        bail!("--from ({from}) must not exceed --to ({to})");
    }
    if to - from >= MAX_SCAN_IDS {
        bail!("scan covers {} ids; at most {MAX_SCAN_IDS} per run", u128::from(to - from) + 1);
    }
    Ok(from..=to)
}
