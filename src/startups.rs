use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

use crate::client::ApiClient;
use crate::model::{FinancialRecord, StartupDetail};
use crate::ui;

/// Lists startup cards, optionally filtered by risk category.
pub async fn run_list(client: &ApiClient, risk_filter: Option<&str>) -> Result<()> {
    let spinner = ui::new_spinner("Loading startups...");
    let result = client.startups().await;
    spinner.finish_and_clear();

    let mut startups = result?;
    if let Some(filter) = risk_filter {
        let category = normalize_risk_filter(filter);
        debug!("Filtering startups by risk category {category:?}");
        startups.retain(|s| s.risk_category.as_deref() == Some(category.as_str()));
    }

    if startups.is_empty() {
        println!("No startups found matching the criteria.");
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text("Startups seeking funding", ui::StyleType::Title)
    );
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Company"),
        ui::header_cell("Industry"),
        ui::header_cell("Funding Goal"),
        ui::header_cell("Acquired"),
        ui::header_cell("Funded"),
        ui::header_cell("Risk"),
    ]);

    for startup in &startups {
        table.add_row(vec![
            Cell::new(startup.id),
            Cell::new(&startup.company_name),
            Cell::new(startup.industry.as_deref().unwrap_or("")),
            Cell::new(ui::format_currency(startup.funding_goal)),
            Cell::new(ui::format_currency(startup.funding_acquired)),
            ui::format_optional_cell(
                funding_progress(startup.funding_goal, startup.funding_acquired),
                |p| format!("{p:.1}%"),
            ),
            ui::risk_cell(startup.risk_category.as_deref()),
        ]);
    }
    println!("{table}");
    println!(
        "\n{}",
        ui::style_text(
            "Run `backr show <id>` for details.",
            ui::StyleType::Subtle
        )
    );

    Ok(())
}

/// Shows one startup's full profile, financial history and risk analysis.
pub async fn run_detail(client: &ApiClient, id: i64) -> Result<()> {
    let spinner = ui::new_spinner("Loading startup details...");
    let result = client.startup_detail(id).await;
    spinner.finish_and_clear();
    let detail = result?;

    print_profile(&detail);
    print_financial_history(&detail.financial_history);
    print_risk_analysis(&detail);

    if detail.investor_has_expressed_interest {
        println!(
            "\n{}",
            ui::style_text(
                "You have expressed interest in this startup. Withdraw it with `backr interest <id> --withdraw`.",
                ui::StyleType::Subtle
            )
        );
    }

    Ok(())
}

/// Expresses or withdraws investor interest.
pub async fn run_interest(client: &ApiClient, id: i64, withdraw: bool) -> Result<()> {
    let message = if withdraw {
        "Withdrawing interest..."
    } else {
        "Expressing interest..."
    };
    let spinner = ui::new_spinner(message);
    let result = client.set_interest(id, !withdraw).await;
    spinner.finish_and_clear();

    let response = result?;
    println!("{}", ui::style_text(&response.message, ui::StyleType::Success));
    Ok(())
}

pub(crate) fn print_profile(detail: &StartupDetail) {
    println!(
        "{}",
        ui::style_text(&detail.company_name, ui::StyleType::Title)
    );
    if let Some(industry) = &detail.industry {
        println!("{}", ui::style_text(industry, ui::StyleType::Subtle));
    }
    if let Some(description) = &detail.description {
        println!("\n{description}");
    }

    println!();
    let years = detail
        .years_operating
        .map_or("N/A".to_string(), |y| format!("{y} years"));
    println!("Operating:          {years}");
    println!(
        "Website:            {}",
        detail.website.as_deref().unwrap_or("N/A")
    );
    if let Some(founder) = &detail.founder_name {
        println!("Founder:            {founder}");
    }
    if let Some(email) = &detail.founder_email {
        println!("Contact:            {email}");
    }
    if let Some(phone) = &detail.contact_phone {
        println!("Phone:              {phone}");
    }

    println!();
    println!(
        "Funding goal:       {}",
        ui::format_currency(detail.funding_goal)
    );
    println!(
        "Funding acquired:   {}",
        ui::format_currency(detail.funding_acquired)
    );
    println!(
        "Equity offered:     {}",
        ui::format_equity(detail.equity_offered)
    );
    println!(
        "Valuation:          {}",
        ui::format_currency(detail.calculated_valuation)
    );
}

pub(crate) fn print_financial_history(history: &[FinancialRecord]) {
    ui::print_separator();
    println!(
        "{}\n",
        ui::style_text("Financial history", ui::StyleType::Title)
    );

    if history.is_empty() {
        println!("No financial history provided.");
        return;
    }

    let mut records = history.to_vec();
    records.sort_by_key(|r| r.year);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Revenue"),
        ui::header_cell("Profit/Loss"),
        ui::header_cell("Growth"),
    ]);

    let mut previous_revenue: Option<f64> = None;
    for record in &records {
        let growth = revenue_growth(previous_revenue, record.revenue);
        previous_revenue = record.revenue;

        table.add_row(vec![
            Cell::new(record.year),
            ui::format_optional_cell(record.revenue, |v| ui::format_currency(Some(v))),
            ui::signed_cell(record.profit, |v| ui::format_currency(Some(v))),
            ui::signed_cell(growth, |g| format!("{g:.1}%")),
        ]);
    }
    println!("{table}");
}

fn print_risk_analysis(detail: &StartupDetail) {
    let Some(risk) = &detail.risk_analysis else {
        return;
    };

    ui::print_separator();
    let style_type = match risk.category.as_str() {
        "Low Risk" => ui::StyleType::Success,
        "High Risk" => ui::StyleType::Error,
        _ => ui::StyleType::Warning,
    };
    println!("{}\n", ui::style_text(&risk.category, style_type));
    if let Some(score) = risk.score {
        println!("Calculated risk score: {score:.1}");
    }
    if risk.reasons.is_empty() {
        println!("No specific contributing factors identified.");
    } else {
        for reason in &risk.reasons {
            println!("  - {reason}");
        }
    }
}

/// Turns a CLI filter like `high-risk` into the backend's category spelling
/// (`High Risk`).
fn normalize_risk_filter(filter: &str) -> String {
    filter
        .split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Year-over-year revenue growth in percent. Defined only when both years
/// reported revenue and the earlier one was non-zero.
fn revenue_growth(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let previous = previous?;
    let current = current?;
    if previous.abs() > 0.0 {
        Some(((current - previous) / previous.abs()) * 100.0)
    } else {
        None
    }
}

/// Share of the funding goal acquired so far, capped at 100%.
fn funding_progress(goal: Option<f64>, acquired: Option<f64>) -> Option<f64> {
    let goal = goal?;
    if goal > 0.0 {
        let acquired = acquired.unwrap_or(0.0);
        Some(((acquired / goal) * 100.0).min(100.0))
    } else {
        None
    }
}
