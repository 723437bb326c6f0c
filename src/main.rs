use anyhow::Result;
use backr::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for backr::AppCommand {
    fn from(cmd: Commands) -> backr::AppCommand {
        match cmd {
            Commands::Login { email } => backr::AppCommand::Login { email },
            Commands::Logout => backr::AppCommand::Logout,
            Commands::Status => backr::AppCommand::Status,
            Commands::Startups { risk } => backr::AppCommand::Startups { risk },
            Commands::Show { id } => backr::AppCommand::Show { id },
            Commands::Interest { id, withdraw } => backr::AppCommand::Interest { id, withdraw },
            Commands::Profile(args) => backr::AppCommand::Profile(args.into()),
            Commands::Financials => backr::AppCommand::Financials,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Log in to the marketplace
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Log out and discard the stored session
    Logout,
    /// Show who is currently logged in
    Status,
    /// List startups seeking funding
    Startups {
        /// Only show one risk category (e.g. "high-risk")
        #[arg(short, long)]
        risk: Option<String>,
    },
    /// Show one startup's full profile and financial history
    Show { id: i64 },
    /// Express interest in a startup (investor accounts)
    Interest {
        id: i64,
        /// Withdraw previously expressed interest instead
        #[arg(long)]
        withdraw: bool,
    },
    /// Show or update your startup profile (startup accounts)
    Profile(ProfileArgs),
    /// Edit your startup's financial history interactively
    Financials,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    company_name: Option<String>,
    /// Pass an empty string to clear an optional text field
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    funding_goal: Option<f64>,
    #[arg(long)]
    funding_acquired: Option<f64>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    logo_url: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    #[arg(long)]
    equity_offered: Option<f64>,
}

impl From<ProfileArgs> for backr::profile::ProfileOpts {
    fn from(args: ProfileArgs) -> Self {
        backr::profile::ProfileOpts {
            company_name: args.company_name,
            description: args.description,
            industry: args.industry,
            funding_goal: args.funding_goal,
            funding_acquired: args.funding_acquired,
            website: args.website,
            logo_url: args.logo_url,
            contact_phone: args.contact_phone,
            equity_offered: args.equity_offered,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => backr::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = backr::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
api:
  base_url: "http://127.0.0.1:5000/api"

# Where the login session is stored. Defaults to the platform data directory.
# session_file: "/home/me/.backr-session"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
