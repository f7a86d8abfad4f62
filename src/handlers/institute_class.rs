//! Class endpoints, scoped to the caller's institute.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_institute;
use crate::database::models::InstituteClass;
use crate::database::repos::{Page, Pagination};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::institute_class_service::{CreateClassInput, UpdateClassInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub section: String,
    #[serde(default)]
    pub academic_session_id: Option<Uuid>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateClassRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ClassListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub academic_session_id: Option<Uuid>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

pub async fn create_class(
    State(state): State<AppState>,
    Json(body): Json<CreateClassRequest>,
) -> ApiResult<InstituteClass> {
    let institute_id = resolve_institute(body.institute_id)?;
    let class = state
        .class_service()
        .create_class(
            institute_id,
            CreateClassInput {
                name: body.name,
                section: body.section,
                academic_session_id: body.academic_session_id,
            },
        )
        .await?;
    Ok(ApiResponse::created(class))
}

pub async fn get_all_classes(
    State(state): State<AppState>,
    Query(query): Query<ClassListQuery>,
) -> ApiResult<Page<InstituteClass>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let page = state
        .class_service()
        .get_all_classes(
            institute_id,
            query.academic_session_id,
            Pagination::new(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_class_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<InstituteClass> {
    let institute_id = resolve_institute(None)?;
    let class = state.class_service().get_class(institute_id, id).await?;
    Ok(ApiResponse::success(class))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateClassRequest>,
) -> ApiResult<InstituteClass> {
    let institute_id = resolve_institute(None)?;
    let class = state
        .class_service()
        .update_class(
            institute_id,
            id,
            UpdateClassInput {
                name: body.name,
                section: body.section,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(ApiResponse::success(class))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<InstituteClass> {
    let institute_id = resolve_institute(None)?;
    let class = state.class_service().delete_class(institute_id, id).await?;
    Ok(ApiResponse::success(class))
}
