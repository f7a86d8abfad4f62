//! User endpoints: login plus the three privileged creation flows.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_institute;
use crate::database::models::{Gender, Role, SanitizedUser};
use crate::database::repos::{Page, Pagination};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::user_service::{LoginResponse, NewUserInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    /// Only read by the institute-user flow
    #[serde(default)]
    pub role: Option<String>,
    /// Only honored for SUPER_ADMIN callers without an institute context
    #[serde(default)]
    pub institute_id: Option<Uuid>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl CreateUserRequest {
    fn into_input(self) -> (NewUserInput, Option<String>, Option<Uuid>) {
        let role = self.role.clone();
        let institute_id = self.institute_id;
        (
            NewUserInput {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                password: self.password,
                country_code: self.country_code,
                phone_no: self.phone_no,
                gender: self.gender,
                dob: self.dob,
                address: self.address,
                profile_url: self.profile_url,
            },
            role,
            institute_id,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

impl UserListQuery {
    fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let response = state.user_service().login(&body.email, &body.password).await?;
    Ok(ApiResponse::success(response))
}

pub async fn create_super_admin(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<SanitizedUser> {
    let (input, _, institute_id) = body.into_input();
    let user = state
        .user_service()
        .create_super_admin(input, institute_id)
        .await?;
    Ok(ApiResponse::created(user))
}

pub async fn create_institute_admin(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<SanitizedUser> {
    let (input, _, explicit) = body.into_input();
    let institute_id = resolve_institute(explicit)?;
    let user = state
        .user_service()
        .create_institute_admin(input, institute_id)
        .await?;
    Ok(ApiResponse::created(user))
}

pub async fn create_institute_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<SanitizedUser> {
    let (input, role, explicit) = body.into_input();
    let role = role.ok_or_else(|| ApiError::invalid_request("Role is required"))?;
    let institute_id = resolve_institute(explicit)?;
    let user = state
        .user_service()
        .create_institute_user(input, &role, institute_id)
        .await?;
    Ok(ApiResponse::created(user))
}

pub async fn get_all_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Page<SanitizedUser>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let role = query
        .role
        .as_deref()
        .map(|raw| {
            raw.parse::<Role>()
                .map_err(|_| ApiError::invalid_request("Unknown role filter"))
        })
        .transpose()?;

    let page = state
        .user_service()
        .get_all_users(institute_id, role, query.pagination())
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_users_without_profile(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Page<SanitizedUser>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let page = state
        .user_service()
        .get_users_without_profile(institute_id, query.pagination())
        .await?;
    Ok(ApiResponse::success(page))
}
