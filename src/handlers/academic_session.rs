//! Academic session endpoints.
//!
//! Dates arrive as `YYYY-MM-DD` strings; missing or unparseable dates fail
//! with a specific INVALID_DATE_RANGE reason before the service runs.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_institute;
use crate::database::models::AcademicSession;
use crate::dates::{self, DateRangeError};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::academic_session_service::{CreateSessionInput, UpdateSessionInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    #[serde(default)]
    pub is_current: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

fn required_date(raw: Option<&str>, on_invalid: DateRangeError) -> Result<NaiveDate, ApiError> {
    let raw = raw.ok_or(DateRangeError::MissingDate)?;
    Ok(dates::parse_date(raw, on_invalid)?)
}

fn optional_date(raw: Option<&str>, on_invalid: DateRangeError) -> Result<Option<NaiveDate>, ApiError> {
    raw.map(|raw| dates::parse_date(raw, on_invalid))
        .transpose()
        .map_err(ApiError::from)
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> ApiResult<AcademicSession> {
    let institute_id = resolve_institute(body.institute_id)?;
    let start_date = required_date(body.start_date.as_deref(), DateRangeError::InvalidStartDate)?;
    let end_date = required_date(body.end_date.as_deref(), DateRangeError::InvalidEndDate)?;

    let session = state
        .session_service()
        .create_session(
            institute_id,
            CreateSessionInput {
                name: body.name,
                start_date,
                end_date,
                is_current: body.is_current,
            },
        )
        .await?;
    Ok(ApiResponse::created(session))
}

pub async fn get_all_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> ApiResult<Vec<AcademicSession>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let sessions = state
        .session_service()
        .get_all_sessions(institute_id, query.is_current, query.is_active)
        .await?;
    Ok(ApiResponse::success(sessions))
}

pub async fn get_current_session(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Option<AcademicSession>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let session = state.session_service().get_current_session(institute_id).await?;
    Ok(ApiResponse::success(session))
}

pub async fn find_session_by_date(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Option<AcademicSession>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let raw = query
        .date
        .as_deref()
        .ok_or_else(|| ApiError::invalid_date_range("A date is required"))?;
    let date = dates::parse_date(raw, DateRangeError::InvalidStartDate)?;
    let session = state
        .session_service()
        .find_session_by_date(institute_id, date)
        .await?;
    Ok(ApiResponse::success(session))
}

pub async fn get_sessions_in_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Vec<AcademicSession>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let start = required_date(query.start_date.as_deref(), DateRangeError::InvalidStartDate)?;
    let end = required_date(query.end_date.as_deref(), DateRangeError::InvalidEndDate)?;
    let sessions = state
        .session_service()
        .get_sessions_in_date_range(institute_id, start, end)
        .await?;
    Ok(ApiResponse::success(sessions))
}

pub async fn get_session_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<AcademicSession> {
    let institute_id = resolve_institute(query.institute_id)?;
    let session = state.session_service().get_session(institute_id, id).await?;
    Ok(ApiResponse::success(session))
}

pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSessionRequest>,
) -> ApiResult<AcademicSession> {
    let institute_id = resolve_institute(None)?;
    let start_date = optional_date(body.start_date.as_deref(), DateRangeError::InvalidStartDate)?;
    let end_date = optional_date(body.end_date.as_deref(), DateRangeError::InvalidEndDate)?;

    let session = state
        .session_service()
        .update_session(
            institute_id,
            id,
            UpdateSessionInput {
                name: body.name,
                start_date,
                end_date,
                is_current: body.is_current,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(ApiResponse::success(session))
}

pub async fn set_current_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AcademicSession> {
    let institute_id = resolve_institute(None)?;
    let session = state.session_service().set_current(institute_id, id).await?;
    Ok(ApiResponse::success(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AcademicSession> {
    let institute_id = resolve_institute(None)?;
    let session = state.session_service().delete_session(institute_id, id).await?;
    Ok(ApiResponse::success(session))
}
