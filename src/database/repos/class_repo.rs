use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::{Page, Pagination};
use crate::database::models::InstituteClass;
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "institute_classes";

#[derive(Clone)]
pub struct ClassRepo {
    repo: Repository<InstituteClass>,
}

impl ClassRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_class(&self, class: &InstituteClass) -> Result<InstituteClass, StoreError> {
        self.repo.insert(class).await
    }

    pub async fn get_class_by_id(&self, id: Uuid) -> Result<Option<InstituteClass>, StoreError> {
        self.repo.find_one(json!({ "id": id })).await
    }

    /// Duplicate guard: name+section must be unique within one session of an
    /// institute
    pub async fn class_exists(
        &self,
        institute_id: Uuid,
        academic_session_id: Uuid,
        name: &str,
        section: &str,
    ) -> Result<bool, StoreError> {
        let found = self
            .repo
            .find_one(json!({
                "institute_id": institute_id,
                "academic_session_id": academic_session_id,
                "name": name,
                "section": section,
                "is_deleted": false
            }))
            .await?;
        Ok(found.is_some())
    }

    pub async fn get_all_classes(
        &self,
        institute_id: Uuid,
        academic_session_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<Page<InstituteClass>, StoreError> {
        let mut filter = json!({ "institute_id": institute_id, "is_deleted": false });
        if let Some(session_id) = academic_session_id {
            filter["academic_session_id"] = json!(session_id);
        }

        let total = self.repo.count(filter.clone()).await?;
        let items = self
            .repo
            .find_many(
                filter,
                FindOptions::sorted("name", SortOrder::Asc)
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

    pub async fn update_class(
        &self,
        id: Uuid,
        mut patch: Value,
    ) -> Result<Option<InstituteClass>, StoreError> {
        patch["updated_at"] = json!(Utc::now());
        self.repo.update_one(json!({ "id": id }), patch).await
    }

    pub async fn delete_class(&self, id: Uuid) -> Result<Option<InstituteClass>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({
                    "is_deleted": true,
                    "is_active": false,
                    "updated_at": Utc::now()
                }),
            )
            .await
    }

    /// Bump student_count by `delta` (can be negative). Read-modify-write;
    /// the store lock makes the two steps appear atomic within one process.
    pub async fn adjust_student_count(
        &self,
        id: Uuid,
        delta: i64,
    ) -> Result<Option<InstituteClass>, StoreError> {
        let Some(class) = self.get_class_by_id(id).await? else {
            return Ok(None);
        };
        let new_count = (class.student_count + delta).max(0);
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({ "student_count": new_count, "updated_at": Utc::now() }),
            )
            .await
    }
}
