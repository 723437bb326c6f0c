pub mod auth;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod financials;
pub mod log;
pub mod model;
pub mod profile;
pub mod session;
pub mod startups;
pub mod ui;

use anyhow::Result;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::session::SessionStore;

pub enum AppCommand {
    Login { email: Option<String> },
    Logout,
    Status,
    Startups { risk: Option<String> },
    Show { id: i64 },
    Interest { id: i64, withdraw: bool },
    Profile(profile::ProfileOpts),
    Financials,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Backr client starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let session = SessionStore::new(config.session_path()?);
    let client = ApiClient::new(&config.api.base_url, session)?;

    match command {
        AppCommand::Login { email } => auth::run_login(&client, email).await,
        AppCommand::Logout => auth::run_logout(&client).await,
        AppCommand::Status => auth::run_status(&client).await,
        AppCommand::Startups { risk } => startups::run_list(&client, risk.as_deref()).await,
        AppCommand::Show { id } => startups::run_detail(&client, id).await,
        AppCommand::Interest { id, withdraw } => {
            startups::run_interest(&client, id, withdraw).await
        }
        AppCommand::Profile(opts) => profile::run(&client, opts).await,
        AppCommand::Financials => financials::run_session(&client).await,
    }
}

/// The client is usable without a config file: defaults point at a local
/// backend. An explicitly passed `--config-path` must exist, so only the
/// default location falls back.
fn load_or_default() -> Result<AppConfig> {
    let path = AppConfig::default_config_path()?;
    if path.exists() {
        AppConfig::load_from_path(&path)
    } else {
        debug!("No config at {}, using defaults", path.display());
        Ok(AppConfig::default())
    }
}
