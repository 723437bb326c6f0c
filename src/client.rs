use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::model::{
    AuthStatus, FinancialRecord, FinancialsUpdate, LoginResponse, MessageResponse, ProfileUpdate,
    SessionUser, StartupDetail, StartupSummary,
};
use crate::session::SessionStore;

/// Thin client over the marketplace HTTP API.
///
/// Every call is one suspension point with exactly one resumption: a decoded
/// success value, a structured backend rejection, or a transport failure,
/// all expressed through [`ApiError`]. Authenticated routes replay the
/// session cookie held by the [`SessionStore`].
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("backr/0.2")
            .build()
            .map_err(ApiError::Transport)?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[instrument(name = "ApiRequest", skip(self, body), fields(method = %method, endpoint = %endpoint))]
    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting {url}");

        let mut request = self.http.request(method, &url);
        if let Some(cookie) = self.session.cookie() {
            request = request.header(header::COOKIE, cookie);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();

        if requires_auth
            && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN)
        {
            warn!("Auth required or forbidden for {endpoint} (status {status})");
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
                .and_then(|value| value.get("error")?.as_str().map(str::to_string));
            return Err(ApiError::backend(status.as_u16(), message));
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }

    pub async fn auth_status(&self) -> ApiResult<AuthStatus> {
        self.request(Method::GET, "/auth/status", None::<&()>, false)
            .await
    }

    /// Logs in and persists the session cookie issued by the backend.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        let url = format!("{}/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
                .and_then(|value| value.get("error")?.as_str().map(str::to_string));
            return Err(ApiError::backend(status.as_u16(), message));
        }

        // The cookie has to be captured before the body consumes the response.
        let cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| v.split(';').next().map(str::to_string));

        let login: LoginResponse = response.json().await.map_err(ApiError::Decode)?;

        if let Some(cookie) = cookie {
            if let Err(e) = self.session.save(&cookie) {
                warn!("Could not persist session: {e}");
            }
        } else {
            warn!("Login response carried no session cookie");
        }

        Ok(login.user)
    }

    pub async fn logout(&self) -> ApiResult<MessageResponse> {
        let result = self
            .request(Method::POST, "/logout", None::<&()>, false)
            .await;
        if result.is_ok() {
            if let Err(e) = self.session.clear() {
                warn!("Could not clear session: {e}");
            }
        }
        result
    }

    pub async fn startups(&self) -> ApiResult<Vec<StartupSummary>> {
        self.request(Method::GET, "/startups", None::<&()>, false)
            .await
    }

    pub async fn startup_detail(&self, id: i64) -> ApiResult<StartupDetail> {
        self.request(Method::GET, &format!("/startups/{id}"), None::<&()>, false)
            .await
    }

    /// Expresses or withdraws investor interest in a startup.
    pub async fn set_interest(&self, id: i64, interested: bool) -> ApiResult<MessageResponse> {
        let method = if interested { Method::POST } else { Method::DELETE };
        self.request(method, &format!("/startups/{id}/interest"), None::<&()>, true)
            .await
    }

    pub async fn my_startup(&self) -> ApiResult<StartupDetail> {
        self.request(Method::GET, "/my-startup", None::<&()>, true)
            .await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<MessageResponse> {
        self.request(Method::PUT, "/my-startup", Some(update), true)
            .await
    }

    pub async fn update_financials(
        &self,
        records: &[FinancialRecord],
    ) -> ApiResult<FinancialsUpdate> {
        self.request(Method::PUT, "/my-startup/financials", Some(records), true)
            .await
    }
}

#[async_trait::async_trait]
impl crate::editor::FinancialsGateway for ApiClient {
    async fn put_financials(&self, records: &[FinancialRecord]) -> ApiResult<FinancialsUpdate> {
        self.update_financials(records).await
    }
}
