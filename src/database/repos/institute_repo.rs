use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::{Page, Pagination};
use crate::database::models::Institute;
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "institutes";

#[derive(Clone)]
pub struct InstituteRepo {
    repo: Repository<Institute>,
}

impl InstituteRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_institute(&self, institute: &Institute) -> Result<Institute, StoreError> {
        self.repo.insert(institute).await
    }

    pub async fn get_institute_by_id(&self, id: Uuid) -> Result<Option<Institute>, StoreError> {
        self.repo.find_one(json!({ "id": id })).await
    }

    /// Codes are stored uppercased; lookup normalizes the same way
    pub async fn get_institute_by_code(&self, code: &str) -> Result<Option<Institute>, StoreError> {
        self.repo
            .find_one(json!({ "code": code.trim().to_uppercase(), "is_deleted": false }))
            .await
    }

    pub async fn update_institute(
        &self,
        id: Uuid,
        mut patch: Value,
    ) -> Result<Option<Institute>, StoreError> {
        patch["updated_at"] = json!(Utc::now());
        self.repo.update_one(json!({ "id": id }), patch).await
    }

    pub async fn delete_institute(&self, id: Uuid) -> Result<Option<Institute>, StoreError> {
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

    pub async fn get_all_institutes(
        &self,
        pagination: Pagination,
    ) -> Result<Page<Institute>, StoreError> {
        let filter = json!({ "is_deleted": false });
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
}
