use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{Page, Pagination};
use crate::database::models::Teacher;
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "teachers";

#[derive(Clone)]
pub struct TeacherRepo {
    repo: Repository<Teacher>,
}

impl TeacherRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_teacher(&self, teacher: &Teacher) -> Result<Teacher, StoreError> {
        self.repo.insert(teacher).await
    }

    pub async fn get_teacher_by_id(&self, id: Uuid) -> Result<Option<Teacher>, StoreError> {
        self.repo.find_one(json!({ "id": id, "is_deleted": false })).await
    }

    pub async fn get_teacher_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Teacher>, StoreError> {
        self.repo
            .find_one(json!({ "user_id": user_id, "is_deleted": false }))
            .await
    }

    pub async fn get_teacher_by_employee_number(
        &self,
        institute_id: Uuid,
        employee_number: &str,
    ) -> Result<Option<Teacher>, StoreError> {
        self.repo
            .find_one(json!({
                "institute_id": institute_id,
                "employee_number": employee_number,
                "is_deleted": false
            }))
            .await
    }

    pub async fn get_all_teachers(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Teacher>, StoreError> {
        let filter = json!({ "institute_id": institute_id, "is_deleted": false });
        let total = self.repo.count(filter.clone()).await?;
        let items = self
            .repo
            .find_many(
                filter,
                FindOptions::sorted("created_at", SortOrder::Desc)
                    .paginated(pagination.skip(), pagination.limit),
            )
            .await?;

        Ok(Page {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        })
    }

    pub async fn delete_teacher(&self, id: Uuid) -> Result<Option<Teacher>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id, "is_deleted": false }),
                json!({ "is_deleted": true, "updated_at": Utc::now() }),
            )
            .await
    }
}
