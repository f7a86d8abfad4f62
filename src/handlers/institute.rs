//! Institute endpoints, all behind SUPER_ADMIN capabilities except the
//! admin listing.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::ListQuery;
use crate::database::models::{Institute, SanitizedUser};
use crate::database::repos::Page;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::institute_service::{CreateInstituteInput, UpdateInstituteInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateInstituteRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub max_allowed_users: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateInstituteRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub max_allowed_users: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub settings: Option<HashMap<String, String>>,
}

pub async fn create_institute(
    State(state): State<AppState>,
    Json(body): Json<CreateInstituteRequest>,
) -> ApiResult<Institute> {
    let institute = state
        .institute_service()
        .create_institute(CreateInstituteInput {
            name: body.name,
            code: body.code,
            address: body.address,
            contact_email: body.contact_email,
            contact_phone: body.contact_phone,
            max_allowed_users: body.max_allowed_users,
        })
        .await?;
    Ok(ApiResponse::created(institute))
}

pub async fn get_all_institutes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<Institute>> {
    let page = state
        .institute_service()
        .get_all_institutes(query.pagination())
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_institute_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Institute> {
    let institute = state.institute_service().get_institute(id).await?;
    Ok(ApiResponse::success(institute))
}

pub async fn update_institute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateInstituteRequest>,
) -> ApiResult<Institute> {
    let institute = state
        .institute_service()
        .update_institute(
            id,
            UpdateInstituteInput {
                name: body.name,
                address: body.address,
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
                max_allowed_users: body.max_allowed_users,
                is_active: body.is_active,
                settings: body.settings,
            },
        )
        .await?;
    Ok(ApiResponse::success(institute))
}

pub async fn delete_institute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Institute> {
    let institute = state.institute_service().delete_institute(id).await?;
    Ok(ApiResponse::success(institute))
}

pub async fn get_institute_admins(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<SanitizedUser>> {
    let page = state
        .institute_service()
        .get_institute_admins(id, query.pagination())
        .await?;
    Ok(ApiResponse::success(page))
}
