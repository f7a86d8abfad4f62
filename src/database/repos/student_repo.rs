use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{Page, Pagination};
use crate::database::models::Student;
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "students";

#[derive(Clone)]
pub struct StudentRepo {
    repo: Repository<Student>,
}

impl StudentRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_student(&self, student: &Student) -> Result<Student, StoreError> {
        self.repo.insert(student).await
    }

    pub async fn get_student_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        self.repo.find_one(json!({ "id": id, "is_deleted": false })).await
    }

    pub async fn get_student_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Student>, StoreError> {
        self.repo
            .find_one(json!({ "user_id": user_id, "is_deleted": false }))
            .await
    }

    pub async fn get_student_by_admission_number(
        &self,
        institute_id: Uuid,
        admission_number: &str,
    ) -> Result<Option<Student>, StoreError> {
        self.repo
            .find_one(json!({
                "institute_id": institute_id,
                "admission_number": admission_number,
                "is_deleted": false
            }))
            .await
    }

    pub async fn get_all_students(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Student>, StoreError> {
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

    pub async fn delete_student(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id, "is_deleted": false }),
                json!({ "is_deleted": true, "updated_at": Utc::now() }),
            )
            .await
    }
}
