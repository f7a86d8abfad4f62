//! Class management within an institute's academic sessions.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::database::models::InstituteClass;
use crate::database::repos::{ClassRepo, Page, Pagination, SessionRepo};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CreateClassInput {
    pub name: String,
    pub section: String,
    /// Defaults to the institute's current session when absent
    pub academic_session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClassInput {
    pub name: Option<String>,
    pub section: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct InstituteClassService {
    classes: ClassRepo,
    sessions: SessionRepo,
}

impl InstituteClassService {
    pub fn new(classes: ClassRepo, sessions: SessionRepo) -> Self {
        Self { classes, sessions }
    }

    pub async fn create_class(
        &self,
        institute_id: Uuid,
        input: CreateClassInput,
    ) -> Result<InstituteClass, ApiError> {
        let name = input.name.trim().to_string();
        let section = input.section.trim().to_string();
        if name.is_empty() || section.is_empty() {
            return Err(ApiError::invalid_request(
                "Class name and section are required",
            ));
        }

        let session_id = match input.academic_session_id {
            Some(id) => {
                let session = self
                    .sessions
                    .get_session_by_id(id)
                    .await?
                    .filter(|s| s.institute_id == institute_id && !s.is_deleted)
                    .ok_or_else(|| ApiError::not_found("Academic session not found"))?;
                session.id
            }
            None => self
                .sessions
                .get_current_session(institute_id)
                .await?
                .ok_or_else(|| {
                    ApiError::not_found("No current academic session is set for this institute")
                })?
                .id,
        };

        if self
            .classes
            .class_exists(institute_id, session_id, &name, &section)
            .await?
        {
            return Err(ApiError::conflict(
                "A class with this name and section already exists in the session",
            ));
        }

        let now = Utc::now();
        let class = InstituteClass {
            id: Uuid::new_v4(),
            institute_id,
            academic_session_id: session_id,
            name,
            section,
            student_count: 0,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.classes.create_class(&class).await?;
        tracing::info!(
            "Class created: {} {} in session {}",
            created.name,
            created.section,
            session_id
        );
        Ok(created)
    }

    pub async fn get_class(
        &self,
        institute_id: Uuid,
        class_id: Uuid,
    ) -> Result<InstituteClass, ApiError> {
        self.load_owned(institute_id, class_id).await
    }

    pub async fn get_all_classes(
        &self,
        institute_id: Uuid,
        academic_session_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<Page<InstituteClass>, ApiError> {
        Ok(self
            .classes
            .get_all_classes(institute_id, academic_session_id, pagination)
            .await?)
    }

    pub async fn update_class(
        &self,
        institute_id: Uuid,
        class_id: Uuid,
        input: UpdateClassInput,
    ) -> Result<InstituteClass, ApiError> {
        let existing = self.load_owned(institute_id, class_id).await?;

        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.name)
            .to_string();
        let section = input
            .section
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.section)
            .to_string();
        if name.is_empty() || section.is_empty() {
            return Err(ApiError::invalid_request(
                "Class name and section are required",
            ));
        }

        if (name != existing.name || section != existing.section)
            && self
                .classes
                .class_exists(institute_id, existing.academic_session_id, &name, &section)
                .await?
        {
            return Err(ApiError::conflict(
                "A class with this name and section already exists in the session",
            ));
        }

        let mut patch = json!({ "name": name, "section": section });
        if let Some(is_active) = input.is_active {
            patch["is_active"] = json!(is_active);
        }

        self.classes
            .update_class(class_id, patch)
            .await?
            .ok_or_else(|| ApiError::not_found("Class not found"))
    }

    pub async fn delete_class(
        &self,
        institute_id: Uuid,
        class_id: Uuid,
    ) -> Result<InstituteClass, ApiError> {
        self.load_owned(institute_id, class_id).await?;
        self.classes
            .delete_class(class_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Class not found"))
    }

    async fn load_owned(
        &self,
        institute_id: Uuid,
        class_id: Uuid,
    ) -> Result<InstituteClass, ApiError> {
        let class = self
            .classes
            .get_class_by_id(class_id)
            .await?
            .filter(|c| c.institute_id == institute_id)
            .ok_or_else(|| ApiError::not_found("Class not found"))?;
        if class.is_deleted {
            return Err(ApiError::gone("Class has been deleted"));
        }
        Ok(class)
    }
}
