use anyhow::{Context, Result, bail};
use console::Term;
use tracing::info;

use crate::client::ApiClient;
use crate::model::UserType;
use crate::ui;

/// Logs in, prompting for whatever the flags did not provide, and stores the
/// session cookie for later commands.
pub async fn run_login(client: &ApiClient, email: Option<String>) -> Result<()> {
    let term = Term::stdout();

    let email = match email {
        Some(email) => email,
        None => {
            term.write_str("Email: ").context("Terminal unavailable")?;
            term.read_line().context("Failed to read email")?
        }
    };
    let email = email.trim().to_string();

    term.write_str("Password: ").context("Terminal unavailable")?;
    let password = term
        .read_secure_line()
        .context("Failed to read password")?;

    if email.is_empty() || password.is_empty() {
        bail!("Please enter both email and password.");
    }

    let spinner = ui::new_spinner("Logging in...");
    let result = client.login(&email, &password).await;
    spinner.finish_and_clear();

    let user = result?;
    info!("Logged in as {} ({:?})", user.name, user.user_type);
    println!(
        "{}",
        ui::style_text(&format!("Welcome, {}!", user.name), ui::StyleType::Success)
    );
    let hint = match user.user_type {
        UserType::Startup => "Manage your profile with `backr profile` and `backr financials`.",
        UserType::Investor => "Browse startups with `backr startups`.",
    };
    println!("{}", ui::style_text(hint, ui::StyleType::Subtle));
    Ok(())
}

pub async fn run_logout(client: &ApiClient) -> Result<()> {
    let spinner = ui::new_spinner("Logging out...");
    let result = client.logout().await;
    spinner.finish_and_clear();

    let response = result?;
    println!("{}", ui::style_text(&response.message, ui::StyleType::Success));
    Ok(())
}

pub async fn run_status(client: &ApiClient) -> Result<()> {
    let spinner = ui::new_spinner("Checking session...");
    let result = client.auth_status().await;
    spinner.finish_and_clear();

    let status = result?;
    match status.user.filter(|_| status.logged_in) {
        Some(user) => {
            let user_type = match user.user_type {
                UserType::Startup => "startup",
                UserType::Investor => "investor",
            };
            println!("Logged in as {} ({user_type}).", user.name);
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
