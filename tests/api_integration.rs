use std::fs;
use tracing::info;

use backr::client::ApiClient;
use backr::editor::FinancialHistoryEditor;
use backr::model::FinancialRecord;
use backr::session::SessionStore;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mock_get(server: &MockServer, endpoint: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn logged_in_client(
        server: &wiremock::MockServer,
        dir: &tempfile::TempDir,
    ) -> backr::client::ApiClient {
        let store = backr::session::SessionStore::new(dir.path().join("session"));
        store.save("session=integration-token").unwrap();
        backr::client::ApiClient::new(&server.uri(), store).unwrap()
    }
}

#[test_log::test(tokio::test)]
async fn test_full_startup_list_flow_with_mock() {
    let mock_response = r#"[
        {
            "id": 1,
            "company_name": "Acme Robotics",
            "description": "Robots for warehouses",
            "industry": "Robotics",
            "funding_goal": 500000,
            "funding_acquired": 125000,
            "logo_url": "",
            "risk_category": "Low Risk"
        },
        {
            "id": 2,
            "company_name": "MoonWare",
            "description": null,
            "industry": null,
            "funding_goal": 0,
            "funding_acquired": 0,
            "logo_url": null,
            "risk_category": "High Risk"
        }
    ]"#;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mock_get(&mock_server, "/startups", mock_response).await;

    // Run through the full command path with a config file, like a user would.
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let session_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_content = format!(
        r#"
api:
  base_url: "{}"
session_file: "{}"
"#,
        mock_server.uri(),
        session_dir.path().join("session").display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = backr::run_command(
        backr::AppCommand::Startups { risk: None },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Startup list command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_financials_submit_round_trip() {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    let session_dir = tempfile::tempdir().unwrap();
    let client = test_utils::logged_in_client(&mock_server, &session_dir);

    // The editor must send the normalized list: deduplicated, ascending.
    let expected_body = serde_json::json!([
        {"year": 2021, "revenue": 800.0, "profit": 20.0},
        {"year": 2022, "revenue": 1000.0, "profit": -50.0}
    ]);
    let mock_response = r#"{
        "message": "Financial history updated successfully",
        "updated_financials": [
            {"year": 2021, "revenue": 800.0, "profit": 20.0},
            {"year": 2022, "revenue": 1000.0, "profit": -50.0}
        ]
    }"#;

    Mock::given(method("PUT"))
        .and(path("/my-startup/financials"))
        .and(header("cookie", "session=integration-token"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
        .mount(&mock_server)
        .await;

    let mut editor = FinancialHistoryEditor::new();
    editor.initialize(&[]);

    let first = editor.entries()[0].id;
    editor.set_year(first, "2022");
    editor.set_revenue(first, "1000");
    editor.set_profit(first, "-50");

    let second = editor.add_record();
    editor.set_year(second, "2021");
    editor.set_revenue(second, "800");
    editor.set_profit(second, "20");

    // A duplicate of 2022 that must be dropped before hitting the wire.
    let third = editor.add_record();
    editor.set_year(third, "2022");
    editor.set_revenue(third, "9999");

    let normalized = editor.serialize();
    assert_eq!(normalized.records.len(), 2);
    assert_eq!(normalized.warnings.len(), 1);
    info!(?normalized, "Submitting normalized history");

    let message = editor
        .submit(&client, normalized.records)
        .await
        .expect("Submit failed");
    assert_eq!(message, "Financial history updated successfully");
    assert_eq!(
        editor.saved(),
        &[
            FinancialRecord {
                year: 2021,
                revenue: Some(800.0),
                profit: Some(20.0),
            },
            FinancialRecord {
                year: 2022,
                revenue: Some(1000.0),
                profit: Some(-50.0),
            },
        ]
    );
    // The rows themselves are untouched by a submit.
    assert_eq!(editor.years_operating(), 3);
}

#[test_log::test(tokio::test)]
async fn test_failed_submit_leaves_editor_unchanged() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    let session_dir = tempfile::tempdir().unwrap();
    let client = test_utils::logged_in_client(&mock_server, &session_dir);

    Mock::given(method("PUT"))
        .and(path("/my-startup/financials"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(r#"{"error": "An internal server error occurred"}"#),
        )
        .mount(&mock_server)
        .await;

    let mut editor = FinancialHistoryEditor::new();
    editor.initialize(&[FinancialRecord {
        year: 2020,
        revenue: Some(5.0),
        profit: None,
    }]);

    let before = editor.serialize();
    let result = editor.submit(&client, before.records.clone()).await;
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().to_string(),
        "An internal server error occurred"
    );
    assert_eq!(editor.serialize(), before);
    assert_eq!(
        editor.saved(),
        &[FinancialRecord {
            year: 2020,
            revenue: Some(5.0),
            profit: None,
        }]
    );
}

#[test_log::test(tokio::test)]
async fn test_profile_update_proposes_derived_years_operating() {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;

    let my_startup = r#"{
        "id": 7,
        "company_name": "Acme Robotics",
        "description": "Robots for warehouses",
        "industry": "Robotics",
        "funding_goal": 500000,
        "funding_acquired": 120000,
        "years_operating": 99,
        "website": "acme.example.com",
        "logo_url": null,
        "contact_phone": null,
        "equity_offered": 10,
        "financial_history": [
            {"year": 2021, "revenue": 800, "profit": 20},
            {"year": 2022, "revenue": 1000, "profit": -50}
        ]
    }"#;
    test_utils::mock_get(&mock_server, "/my-startup", my_startup).await;

    // The stale stored value (99) must be replaced by the derived count (2).
    let expected_body = serde_json::json!({
        "company_name": "Acme Robotics",
        "description": "Robots for warehouses",
        "industry": "Robotics",
        "funding_goal": 500000.0,
        "funding_acquired": 250000.0,
        "years_operating": 2,
        "website": "acme.example.com",
        "logo_url": null,
        "contact_phone": null,
        "equity_offered": 10.0
    });
    Mock::given(method("PUT"))
        .and(path("/my-startup"))
        .and(body_json(&expected_body))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"message": "Startup profile details updated successfully"}"#),
        )
        .mount(&mock_server)
        .await;

    let config_file = tempfile::NamedTempFile::new().unwrap();
    let session_dir = tempfile::tempdir().unwrap();
    let session_path = session_dir.path().join("session");
    SessionStore::new(session_path.clone())
        .save("session=integration-token")
        .unwrap();
    let config_content = format!(
        r#"
api:
  base_url: "{}"
session_file: "{}"
"#,
        mock_server.uri(),
        session_path.display()
    );
    fs::write(config_file.path(), &config_content).unwrap();

    let opts = backr::profile::ProfileOpts {
        funding_acquired: Some(250000.0),
        ..Default::default()
    };
    let result = backr::run_command(
        backr::AppCommand::Profile(opts),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Profile update failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_unauthenticated_financials_fetch_fails_with_guidance() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-startup"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error": "Unauthorized"}"#))
        .mount(&mock_server)
        .await;

    let session_dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(session_dir.path().join("session"));
    let client = ApiClient::new(&mock_server.uri(), store).unwrap();

    let result = client.my_startup().await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("backr login"));
}
