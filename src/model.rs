use serde::{Deserialize, Serialize};

/// One year of a startup's financials. `revenue` and `profit` are
/// independently optional; `null` on the wire means "not provided", which is
/// distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub year: i32,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Startup,
    Investor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize)]
pub struct AuthStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: SessionUser,
}

/// Card-level shape returned by `GET /startups`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupSummary {
    pub id: i64,
    pub company_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub funding_goal: Option<f64>,
    #[serde(default)]
    pub funding_acquired: Option<f64>,
    #[serde(default)]
    pub risk_category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskAnalysis {
    pub category: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Full shape returned by `GET /startups/{id}` and `GET /my-startup`.
///
/// The two endpoints share most fields; founder contact, risk analysis,
/// valuation and interest status only appear on the public detail route, so
/// they default to `None` here.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupDetail {
    pub id: i64,
    pub company_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub funding_goal: Option<f64>,
    #[serde(default)]
    pub funding_acquired: Option<f64>,
    #[serde(default)]
    pub years_operating: Option<i64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub equity_offered: Option<f64>,
    #[serde(default)]
    pub financial_history: Vec<FinancialRecord>,
    #[serde(default)]
    pub founder_name: Option<String>,
    #[serde(default)]
    pub founder_email: Option<String>,
    #[serde(default)]
    pub calculated_valuation: Option<f64>,
    #[serde(default)]
    pub risk_analysis: Option<RiskAnalysis>,
    #[serde(default)]
    pub investor_has_expressed_interest: bool,
}

/// Profile field map for `PUT /my-startup`. Sent read-modify-write: the full
/// current profile with CLI overrides applied, plus the proposed
/// `years_operating` derived from the financial-history record count.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub company_name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub funding_goal: Option<f64>,
    pub funding_acquired: Option<f64>,
    pub years_operating: i64,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub contact_phone: Option<String>,
    pub equity_offered: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response of `PUT /my-startup/financials`. The server echoes the list it
/// actually stored; older deployments omit it.
#[derive(Debug, Deserialize)]
pub struct FinancialsUpdate {
    pub message: String,
    #[serde(default)]
    pub updated_financials: Option<Vec<FinancialRecord>>,
}
