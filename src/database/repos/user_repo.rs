use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{Page, Pagination};
use crate::database::models::{Role, User};
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct UserRepo {
    repo: Repository<User>,
}

impl UserRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        self.repo.insert(user).await
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.repo.find_one(json!({ "id": id })).await
    }

    /// Scoped email lookup: the same email may exist in different institutes,
    /// so uniqueness checks always carry the institute scope (None means the
    /// untenanted SUPER_ADMIN scope).
    pub async fn get_user_by_email(
        &self,
        email: &str,
        institute_id: Option<Uuid>,
    ) -> Result<Option<User>, StoreError> {
        self.repo
            .find_one(json!({
                "email": email.to_lowercase(),
                "institute_id": institute_id,
                "is_deleted": false
            }))
            .await
    }

    /// Login lookup is by email alone; the institute is resolved from the
    /// stored record, never from the caller.
    pub async fn get_user_by_email_for_login(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        self.repo.find_one(json!({ "email": email.to_lowercase() })).await
    }

    pub async fn get_user_by_phone(
        &self,
        phone_no: &str,
        country_code: Option<&str>,
        institute_id: Option<Uuid>,
    ) -> Result<Option<User>, StoreError> {
        self.repo
            .find_one(json!({
                "phone_no": phone_no,
                "country_code": country_code,
                "institute_id": institute_id,
                "is_deleted": false
            }))
            .await
    }

    pub async fn update_last_login(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let now = Utc::now();
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({ "last_login": now, "updated_at": now }),
            )
            .await
    }

    /// Set or clear the linked Teacher/Student profile reference
    pub async fn set_profile_id(
        &self,
        id: Uuid,
        profile_id: Option<Uuid>,
    ) -> Result<Option<User>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({ "profile_id": profile_id, "updated_at": Utc::now() }),
            )
            .await
    }

    pub async fn get_all_users(
        &self,
        institute_id: Uuid,
        role: Option<Role>,
        pagination: Pagination,
    ) -> Result<Page<User>, StoreError> {
        let mut filter = json!({ "institute_id": institute_id, "is_deleted": false });
        if let Some(role) = role {
            filter["role"] = json!(role);
        }

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

    /// Users with a linkable role (TEACHER/STUDENT) that have no profile
    /// aggregate attached yet
    pub async fn get_users_without_profile(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<User>, StoreError> {
        let filter = json!({
            "institute_id": institute_id,
            "role": { "$in": [Role::Teacher, Role::Student] },
            "profile_id": null,
            "is_deleted": false
        });

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

    pub async fn count_users(&self, institute_id: Uuid) -> Result<u64, StoreError> {
        self.repo
            .count(json!({ "institute_id": institute_id, "is_deleted": false }))
            .await
    }
}
