//! Authorization gate behavior over the real route table.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() -> Result<()> {
    let app = spawn_app();
    let (status, body) = app
        .request("GET", "/v1/academic-session/get-all", None, None)
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let app = spawn_app();
    let (status, body) = app
        .request(
            "GET",
            "/v1/academic-session/get-all",
            Some("not.a.token"),
            None,
        )
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn missing_capability_is_forbidden() -> Result<()> {
    let app = spawn_app();
    let (institute, admin_token) = app.seed_institute_admin("SPR001").await?;

    // a TEACHER user holds GET_CLASSES but not CREATE_USER
    let (status, _) = app
        .request(
            "POST",
            "/v1/user/create-institute-user",
            Some(&admin_token),
            Some(json!({
                "first_name": "Meera",
                "last_name": "Iyer",
                "email": "meera@example.com",
                "password": "meera-password",
                "role": "TEACHER"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let teacher_token = app.login("meera@example.com", "meera-password").await?;
    let (status, body) = app
        .request(
            "POST",
            "/v1/user/create-institute-user",
            Some(&teacher_token),
            Some(json!({
                "first_name": "X",
                "last_name": "Y",
                "email": "x@example.com",
                "password": "x-password-1",
                "role": "STUDENT",
                "institute_id": institute.id
            })),
        )
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn granted_capability_passes_the_gate() -> Result<()> {
    let app = spawn_app();
    let (_, admin_token) = app.seed_institute_admin("SPR001").await?;

    let (status, body) = app
        .request("GET", "/v1/user/get-all-users", Some(&admin_token), None)
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // the admin itself is listed, password stripped
    assert_eq!(body["data"]["total"], 1);
    assert!(body["data"]["items"][0].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn institute_admin_cannot_reach_super_admin_routes() -> Result<()> {
    let app = spawn_app();
    let (_, admin_token) = app.seed_institute_admin("SPR001").await?;

    let (status, body) = app
        .request(
            "POST",
            "/v1/institute/create-new-institute",
            Some(&admin_token),
            Some(json!({ "name": "Rival High", "code": "RIV001" })),
        )
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn super_admin_can_manage_institutes() -> Result<()> {
    let app = spawn_app();
    let root_token = app.seed_super_admin().await?;

    let (status, body) = app
        .request(
            "POST",
            "/v1/institute/create-new-institute",
            Some(&root_token),
            Some(json!({ "name": "Springfield High", "code": "spr001" })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["code"], "SPR001");

    let (status, body) = app
        .request("GET", "/v1/institute/get-all-institute", Some(&root_token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    Ok(())
}

#[tokio::test]
async fn deleted_user_token_is_gone() -> Result<()> {
    let app = spawn_app();
    let (_, admin_token) = app.seed_institute_admin("SPR001").await?;

    let (status, _) = app
        .request(
            "POST",
            "/v1/user/create-institute-user",
            Some(&admin_token),
            Some(json!({
                "first_name": "Meera",
                "last_name": "Iyer",
                "email": "meera@example.com",
                "password": "meera-password",
                "role": "TEACHER"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let teacher_token = app.login("meera@example.com", "meera-password").await?;
    let teacher = app
        .state
        .user_repo()
        .get_user_by_email_for_login("meera@example.com")
        .await?
        .expect("teacher exists");
    common::soft_delete_user(&app.state, teacher.id).await;

    let (status, body) = app
        .request(
            "GET",
            "/v1/instituteClass/get-all-classes",
            Some(&teacher_token),
            None,
        )
        .await?;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], "GONE");
    Ok(())
}

#[tokio::test]
async fn health_and_root_are_public() -> Result<()> {
    let app = spawn_app();
    let (status, body) = app.request("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = app.request("GET", "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
