use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use adctl::config::{CliOverrides, Config};

mod cmd;

#[derive(Parser)]
#[command(name = "adctl")]
#[command(version, about = "Manage Meta ad campaigns: bulk pause, activate, archive and duplicate")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Path to adctl.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL. Overrides ADCTL_BACKEND_URL and the config file.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Ad account id for this invocation only (not saved)
    #[arg(long, global = true)]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List or select ad accounts
    Accounts {
        #[command(subcommand)]
        command: Option<AccountsCommands>,
    },
    /// List campaigns for the selected account
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
        /// Only show campaigns with this status
        #[arg(long)]
        status: Option<String>,
        /// Include archived campaigns
        #[arg(long)]
        include_archived: bool,
    },
    /// Show one campaign with its metrics, ad sets and ads
    Show { id: String },
    /// Create a campaign (PAUSED unless --active)
    Create {
        name: String,
        /// traffic, leads, sales, engagement, awareness or app_promotion
        #[arg(short, long, default_value = "traffic")]
        objective: String,
        /// Daily budget in the account currency, e.g. 50.00
        #[arg(long)]
        daily_budget: Option<f64>,
        /// Start delivering immediately
        #[arg(long)]
        active: bool,
    },
    /// Pause a campaign
    Pause { id: String },
    /// Activate a campaign
    Activate { id: String },
    /// Flip a campaign between ACTIVE and PAUSED
    Toggle { id: String },
    /// Archive (delete) a campaign
    Archive { id: String },
    /// Duplicate a campaign
    Duplicate {
        id: String,
        /// Number of copies, created one request at a time
        #[arg(short, long, default_value = "1")]
        count: u32,
    },
    /// Run an action over several campaigns, one at a time
    Bulk {
        /// pause, activate, archive or duplicate
        action: String,
        /// Campaign ids, processed in the order given
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Refresh metrics from Meta for the account or one campaign
    Metrics {
        #[arg(long)]
        campaign: Option<String>,
    },
    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand, Clone)]
pub enum AccountsCommands {
    /// List active ad accounts
    List,
    /// Save the account used by later commands
    Select { account_id: String },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default adctl.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(CliOverrides {
        config_path: cli.config.clone(),
        backend_url: cli.backend_url.clone(),
        account: cli.account.clone(),
        verbose: cli.verbose,
        yes: cli.yes,
    })
    .context("Failed to load configuration")?;

    let _log_guard = adctl::logging::init(config.verbose, config.log_dir())?;

    match &cli.command {
        Commands::Accounts { command } => cmd::cmd_accounts(&config, command.clone()).await?,
        Commands::List {
            search,
            status,
            include_archived,
        } => {
            cmd::cmd_list(&config, search.clone(), status.as_deref(), *include_archived).await?
        }
        Commands::Show { id } => cmd::cmd_show(&config, id).await?,
        Commands::Create {
            name,
            objective,
            daily_budget,
            active,
        } => cmd::cmd_create(&config, name, objective, *daily_budget, *active).await?,
        Commands::Pause { id } => {
            cmd::cmd_set_status(&config, id, adctl::campaign::CampaignStatus::Paused).await?
        }
        Commands::Activate { id } => {
            cmd::cmd_set_status(&config, id, adctl::campaign::CampaignStatus::Active).await?
        }
        Commands::Toggle { id } => cmd::cmd_toggle(&config, id).await?,
        Commands::Archive { id } => cmd::cmd_archive(&config, id).await?,
        Commands::Duplicate { id, count } => cmd::cmd_duplicate(&config, id, *count).await?,
        Commands::Bulk { action, ids } => cmd::cmd_bulk(&config, action, ids).await?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
        Commands::Metrics { campaign } => cmd::cmd_metrics(&config, campaign.as_deref()).await?,
        Commands::Health => cmd::cmd_health(&config).await?,
    }

    Ok(())
}
