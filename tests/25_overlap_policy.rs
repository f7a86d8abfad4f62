//! Reject overlap policy. Lives in its own binary because the policy is
//! read from the environment once per process; the env var must be set
//! before anything touches the config.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn overlapping_session_is_rejected_under_reject_policy() -> Result<()> {
    std::env::set_var("SESSIONS_OVERLAP_POLICY", "reject");

    let app = spawn_app();
    let (_, token) = app.seed_institute_admin("RJP001").await?;

    let (status, _) = app
        .request(
            "POST",
            "/v1/academic-session/create",
            Some(&token),
            Some(json!({
                "name": "2024-2025",
                "start_date": "2024-04-01",
                "end_date": "2025-03-31"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(
            "POST",
            "/v1/academic-session/create",
            Some(&token),
            Some(json!({
                "name": "Summer Term",
                "start_date": "2024-05-01",
                "end_date": "2024-08-31"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // a disjoint follow-on year is still fine
    let (status, _) = app
        .request(
            "POST",
            "/v1/academic-session/create",
            Some(&token),
            Some(json!({
                "name": "2025-2026",
                "start_date": "2025-04-01",
                "end_date": "2026-03-31"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}
