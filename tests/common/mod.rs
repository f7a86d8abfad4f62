//! Shared harness for integration tests: an in-process router over a fresh
//! store, plus seed and request helpers.
#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use institute_api_rust::database::models::Institute;
use institute_api_rust::router::build_router;
use institute_api_rust::services::institute_service::CreateInstituteInput;
use institute_api_rust::services::user_service::NewUserInput;
use institute_api_rust::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Fresh application over an empty store.
pub fn spawn_app() -> TestApp {
    let state = AppState::new();
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Seed a SUPER_ADMIN and return a login token for it.
    pub async fn seed_super_admin(&self) -> Result<String> {
        self.state
            .user_service()
            .create_super_admin(new_user_input("root@example.com", "root-password"), None)
            .await?;
        self.login("root@example.com", "root-password").await
    }

    /// Seed an institute with one admin; returns the institute and the
    /// admin's token.
    pub async fn seed_institute_admin(&self, code: &str) -> Result<(Institute, String)> {
        let institute = self
            .state
            .institute_service()
            .create_institute(CreateInstituteInput {
                name: format!("Institute {}", code),
                code: code.to_string(),
                address: "1 Main Street".to_string(),
                contact_email: format!("office-{}@example.com", code.to_lowercase()),
                contact_phone: "555-0100".to_string(),
                max_allowed_users: Some(100),
            })
            .await?;

        let email = format!("admin-{}@example.com", code.to_lowercase());
        self.state
            .user_service()
            .create_institute_admin(new_user_input(&email, "admin-password"), institute.id)
            .await?;
        let token = self.login(&email, "admin-password").await?;
        Ok((institute, token))
    }

    /// Log in through the real endpoint and return the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .request(
                "POST",
                "/v1/user/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {status} {body}");
        Ok(body["data"]["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string())
    }

    /// Issue one request against the in-process router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }
}

pub fn new_user_input(email: &str, password: &str) -> NewUserInput {
    NewUserInput {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        country_code: None,
        phone_no: None,
        gender: None,
        dob: None,
        address: None,
        profile_url: None,
    }
}

/// Mark a user soft-deleted directly in the store.
pub async fn soft_delete_user(state: &AppState, user_id: Uuid) {
    state
        .store()
        .update_one(
            "users",
            &json!({ "id": user_id }),
            &json!({ "is_deleted": true }),
        )
        .await
        .expect("store update");
}
