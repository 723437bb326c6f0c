use anyhow::Result;

use crate::client::ApiClient;
use crate::editor::FinancialHistoryEditor;
use crate::model::{ProfileUpdate, StartupDetail};
use crate::startups;
use crate::ui;

/// Field overrides for a profile update. `None` keeps the current value; an
/// empty string clears an optional text field.
#[derive(Debug, Default, Clone)]
pub struct ProfileOpts {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub funding_goal: Option<f64>,
    pub funding_acquired: Option<f64>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub contact_phone: Option<String>,
    pub equity_offered: Option<f64>,
}

impl ProfileOpts {
    fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.description.is_none()
            && self.industry.is_none()
            && self.funding_goal.is_none()
            && self.funding_acquired.is_none()
            && self.website.is_none()
            && self.logo_url.is_none()
            && self.contact_phone.is_none()
            && self.equity_offered.is_none()
    }
}

/// Shows the logged-in startup's profile, or updates it when any override
/// flag was given (read-modify-write over the fetched profile).
pub async fn run(client: &ApiClient, opts: ProfileOpts) -> Result<()> {
    let spinner = ui::new_spinner("Loading your startup...");
    let result = client.my_startup().await;
    spinner.finish_and_clear();
    let detail = result?;

    if opts.is_empty() {
        startups::print_profile(&detail);
        startups::print_financial_history(&detail.financial_history);
        return Ok(());
    }

    let update = build_update(&detail, &opts);
    let spinner = ui::new_spinner("Updating profile...");
    let result = client.update_profile(&update).await;
    spinner.finish_and_clear();

    let response = result?;
    println!("{}", ui::style_text(&response.message, ui::StyleType::Success));
    Ok(())
}

/// Overlays the CLI flags on the fetched profile. The proposed
/// `years_operating` is the editing surface's derived row count for the
/// fetched history. That is 1 for an empty history, since the editor
/// always bootstraps one blank row.
fn build_update(detail: &StartupDetail, opts: &ProfileOpts) -> ProfileUpdate {
    fn text(override_: &Option<String>, current: &Option<String>) -> Option<String> {
        match override_ {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.clone()),
            None => current.clone(),
        }
    }

    let mut editor = FinancialHistoryEditor::new();
    editor.initialize(&detail.financial_history);

    ProfileUpdate {
        company_name: opts
            .company_name
            .clone()
            .unwrap_or_else(|| detail.company_name.clone()),
        description: text(&opts.description, &detail.description),
        industry: text(&opts.industry, &detail.industry),
        funding_goal: opts.funding_goal.or(detail.funding_goal),
        funding_acquired: opts.funding_acquired.or(detail.funding_acquired),
        years_operating: editor.years_operating() as i64,
        website: text(&opts.website, &detail.website),
        logo_url: text(&opts.logo_url, &detail.logo_url),
        contact_phone: text(&opts.contact_phone, &detail.contact_phone),
        equity_offered: opts.equity_offered.or(detail.equity_offered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FinancialRecord;

    fn detail() -> StartupDetail {
        serde_json::from_str(
            r#"{
                "id": 7,
                "company_name": "Acme Robotics",
                "description": "Robots for warehouses",
                "industry": "Robotics",
                "funding_goal": 500000,
                "funding_acquired": 120000,
                "years_operating": 2,
                "website": "acme.example.com",
                "equity_offered": 10,
                "financial_history": [
                    {"year": 2021, "revenue": 800, "profit": 20},
                    {"year": 2022, "revenue": 1000, "profit": -50}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn overrides_apply_and_unset_fields_pass_through() {
        let opts = ProfileOpts {
            funding_acquired: Some(250000.0),
            description: Some("Autonomous warehouse robots".to_string()),
            ..Default::default()
        };
        let update = build_update(&detail(), &opts);

        assert_eq!(update.company_name, "Acme Robotics");
        assert_eq!(update.funding_goal, Some(500000.0));
        assert_eq!(update.funding_acquired, Some(250000.0));
        assert_eq!(
            update.description.as_deref(),
            Some("Autonomous warehouse robots")
        );
        assert_eq!(update.website.as_deref(), Some("acme.example.com"));
    }

    #[test]
    fn empty_string_clears_optional_text_fields() {
        let opts = ProfileOpts {
            website: Some(String::new()),
            ..Default::default()
        };
        let update = build_update(&detail(), &opts);
        assert_eq!(update.website, None);
    }

    #[test]
    fn proposed_years_operating_tracks_record_count() {
        let update = build_update(&detail(), &ProfileOpts::default());
        assert_eq!(update.years_operating, 2);
    }

    #[test]
    fn empty_history_still_proposes_one_year() {
        // The editing surface bootstraps one blank row for an empty history,
        // and the proposal counts rows, so it never drops below 1.
        let mut d = detail();
        d.financial_history = Vec::<FinancialRecord>::new();
        let update = build_update(&d, &ProfileOpts::default());
        assert_eq!(update.years_operating, 1);
    }
}
