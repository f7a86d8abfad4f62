//! Teacher profile endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_institute;
use crate::database::models::Teacher;
use crate::database::repos::{Page, Pagination};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::teacher_service::CreateTeacherInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    pub user_id: Uuid,
    pub employee_number: String,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Json(body): Json<CreateTeacherRequest>,
) -> ApiResult<Teacher> {
    let institute_id = resolve_institute(body.institute_id)?;
    let teacher = state
        .teacher_service()
        .create_teacher(
            institute_id,
            CreateTeacherInput {
                user_id: body.user_id,
                employee_number: body.employee_number,
                qualification: body.qualification,
                specialization: body.specialization,
                joining_date: body.joining_date,
            },
        )
        .await?;
    Ok(ApiResponse::created(teacher))
}

pub async fn get_all_teachers(
    State(state): State<AppState>,
    Query(query): Query<TeacherListQuery>,
) -> ApiResult<Page<Teacher>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let page = state
        .teacher_service()
        .get_all_teachers(institute_id, Pagination::new(query.page, query.limit))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_teacher_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Teacher> {
    let institute_id = resolve_institute(None)?;
    let teacher = state.teacher_service().get_teacher(institute_id, id).await?;
    Ok(ApiResponse::success(teacher))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Teacher> {
    let institute_id = resolve_institute(None)?;
    let teacher = state.teacher_service().delete_teacher(institute_id, id).await?;
    Ok(ApiResponse::success(teacher))
}
