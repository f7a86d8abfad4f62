//! Student profile endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_institute;
use crate::database::models::Student;
use crate::database::repos::{Page, Pagination};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::student_service::CreateStudentInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub user_id: Uuid,
    pub admission_number: String,
    #[serde(default)]
    pub current_class_id: Option<Uuid>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<CreateStudentRequest>,
) -> ApiResult<Student> {
    let institute_id = resolve_institute(body.institute_id)?;
    let student = state
        .student_service()
        .create_student(
            institute_id,
            CreateStudentInput {
                user_id: body.user_id,
                admission_number: body.admission_number,
                current_class_id: body.current_class_id,
                guardian_name: body.guardian_name,
                guardian_phone: body.guardian_phone,
            },
        )
        .await?;
    Ok(ApiResponse::created(student))
}

pub async fn get_all_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> ApiResult<Page<Student>> {
    let institute_id = resolve_institute(query.institute_id)?;
    let page = state
        .student_service()
        .get_all_students(institute_id, Pagination::new(query.page, query.limit))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Student> {
    let institute_id = resolve_institute(None)?;
    let student = state.student_service().get_student(institute_id, id).await?;
    Ok(ApiResponse::success(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Student> {
    let institute_id = resolve_institute(None)?;
    let student = state.student_service().delete_student(institute_id, id).await?;
    Ok(ApiResponse::success(student))
}
