//! payops: operator console for the payments platform.
//!
//! Browses organizations, accounts, and payouts through the backend's
//! REST API, and triggers organization/account/payout creation and
//! payout execution. The organization list goes through a persisted
//! two-minute cache; the grouped accounts view fans out one request per
//! organization.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use common::{
    Account, CreateAccountRequest, CreateOrganizationRequest, Error, PayoutRequest,
    PayoutSearchRequest,
};
use orgdata::{AccountAggregator, FileStore, OrgDirectoryCache, OrgSummary, SystemClock};
use platform_client::PlatformRestClient;

/// Payments platform operator console.
#[derive(Parser)]
#[command(name = "payops", about = "Operator console for the payments platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List organizations (served from the cache when fresh).
    Orgs {
        /// Bypass the cache and force a directory fetch.
        #[arg(long)]
        refresh: bool,
    },
    /// Show one organization in full.
    Org { org_id: String },
    /// Create an organization.
    OrgCreate {
        /// "individual" or "business".
        #[arg(long = "type", value_name = "TYPE")]
        org_type: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        business_name: Option<String>,
    },
    /// Show every organization's accounts, grouped.
    Accounts,
    /// Show one account in full.
    Account { org_id: String, account_id: String },
    /// Create an account under an organization.
    AccountCreate {
        org_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List payouts for an account.
    Payouts { org_id: String, account_id: String },
    /// Create a payout request from a JSON file.
    PayoutCreate {
        org_id: String,
        /// Path to a JSON file holding the payout request body.
        #[arg(long)]
        file: PathBuf,
    },
    /// Execute a previously created payout request.
    PayoutExecute {
        org_id: String,
        account_id: String,
        payout_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payops=info,platform_client=info,orgdata=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, cfg).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cfg: common::ConsoleConfig) -> Result<(), Error> {
    let client = Arc::new(PlatformRestClient::with_limits(
        cfg.api_base_url.clone(),
        Some(cfg.api_key.clone()),
        cfg.http.timeout_secs,
        cfg.http.reads_per_sec,
        cfg.http.writes_per_sec,
    ));

    let cache = OrgDirectoryCache::new(
        client.clone(),
        Arc::new(FileStore::new(&cfg.state_dir)),
        Arc::new(SystemClock),
    )
    .with_freshness(cfg.cache.freshness_ms);

    match cli.command {
        Command::Orgs { refresh } => {
            let cache = if refresh {
                // A non-positive window makes every envelope stale.
                cache.with_freshness(-1)
            } else {
                cache
            };
            let summaries = cache.get_organization_ids().await?;
            print_org_summaries(&summaries);
        }

        Command::Org { org_id } => {
            let org = client.get_organization(&org_id).await?;
            println!("{}", serde_json::to_string_pretty(&org)?);
        }

        Command::OrgCreate {
            org_type,
            email,
            first_name,
            last_name,
            business_name,
        } => {
            let req = CreateOrganizationRequest {
                org_type,
                email,
                first_name,
                last_name,
                business_name,
            };
            let org = client.create_organization(&req).await?;
            info!("Created organization {}", org.id);
            println!("{}", serde_json::to_string_pretty(&org)?);
        }

        Command::Accounts => {
            let summaries = cache.get_organization_ids().await?;
            let org_ids: Vec<String> = summaries.iter().map(|s| s.id.clone()).collect();

            let aggregator = AccountAggregator::new(client.clone());
            let grouped = aggregator.load_accounts_for_organizations(&org_ids).await?;

            for summary in &summaries {
                let accounts = grouped.get(&summary.id).map(|a| a.as_slice()).unwrap_or(&[]);
                print_org_accounts(summary, accounts);
            }
        }

        Command::Account { org_id, account_id } => {
            let account = client.get_account(&org_id, &account_id).await?;
            println!("{}", serde_json::to_string_pretty(&account)?);
        }

        Command::AccountCreate {
            org_id,
            name,
            description,
        } => {
            let req = CreateAccountRequest { name, description };
            let account = client.create_account(&org_id, &req).await?;
            info!("Created account {} under {}", account.id, org_id);
            println!("{}", serde_json::to_string_pretty(&account)?);
        }

        Command::Payouts { org_id, account_id } => {
            let payouts = client
                .search_payouts(&org_id, &account_id, &PayoutSearchRequest::default())
                .await?;
            if payouts.is_empty() {
                println!("No payouts for {}/{}", org_id, account_id);
            }
            for payout in &payouts {
                println!(
                    "{}  {:<18} {:>3} item(s)  memo: {}",
                    payout.id,
                    payout.status,
                    payout.payouts.len(),
                    if payout.memo.is_empty() { "—" } else { &payout.memo },
                );
            }
        }

        Command::PayoutCreate { org_id, file } => {
            let raw = std::fs::read_to_string(&file)?;
            let req: PayoutRequest = serde_json::from_str(&raw)?;
            let payout = client.create_payout(&org_id, &req).await?;
            info!("Created payout {} ({})", payout.id, payout.status);
            println!("{}", serde_json::to_string_pretty(&payout)?);
        }

        Command::PayoutExecute {
            org_id,
            account_id,
            payout_id,
        } => {
            let payout = client
                .execute_payout(&org_id, &account_id, &payout_id)
                .await?;
            info!("Executed payout {} → {}", payout.id, payout.status);
            println!("{}", serde_json::to_string_pretty(&payout)?);
        }
    }

    Ok(())
}

fn print_org_summaries(summaries: &[OrgSummary]) {
    if summaries.is_empty() {
        println!("No organizations.");
        return;
    }
    println!("{:<38} {:<30} {}", "ID", "NAME", "ACTIVE");
    for s in summaries {
        println!(
            "{:<38} {:<30} {}",
            s.id,
            s.name,
            if s.active { "yes" } else { "no" }
        );
    }
}

fn print_org_accounts(summary: &OrgSummary, accounts: &[Account]) {
    println!(
        "{} ({}){}",
        summary.name,
        summary.id,
        if summary.active { "" } else { "  [inactive]" }
    );
    if accounts.is_empty() {
        println!("  (no accounts)");
    }
    for account in accounts {
        let balances = account
            .account_details
            .balances
            .iter()
            .map(|b| format!("{} {}", b.token_amount, b.token_symbol))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<38} {:<20} {:<10} {}",
            account.id,
            account.name,
            account.status,
            if balances.is_empty() { "—".to_string() } else { balances },
        );
    }
    println!();
}
