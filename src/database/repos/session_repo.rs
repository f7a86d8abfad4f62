use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::AcademicSession;
use crate::database::repository::Repository;
use crate::database::store::{FindOptions, MemoryStore, SortOrder, StoreError};

const COLLECTION: &str = "academic_sessions";

#[derive(Clone)]
pub struct SessionRepo {
    repo: Repository<AcademicSession>,
}

impl SessionRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            repo: Repository::new(COLLECTION, store),
        }
    }

    pub async fn create_session(
        &self,
        session: &AcademicSession,
    ) -> Result<AcademicSession, StoreError> {
        self.repo.insert(session).await
    }

    pub async fn get_session_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AcademicSession>, StoreError> {
        self.repo.find_one(json!({ "id": id })).await
    }

    pub async fn get_session_by_name(
        &self,
        institute_id: Uuid,
        name: &str,
    ) -> Result<Option<AcademicSession>, StoreError> {
        self.repo
            .find_one(json!({
                "institute_id": institute_id,
                "name": name,
                "is_deleted": false
            }))
            .await
    }

    /// All non-deleted sessions of an institute, latest start date first
    pub async fn get_all_sessions(
        &self,
        institute_id: Uuid,
        is_current: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Vec<AcademicSession>, StoreError> {
        let mut filter = json!({ "institute_id": institute_id, "is_deleted": false });
        if let Some(is_current) = is_current {
            filter["is_current"] = json!(is_current);
        }
        if let Some(is_active) = is_active {
            filter["is_active"] = json!(is_active);
        }

        self.repo
            .find_many(filter, FindOptions::sorted("start_date", SortOrder::Desc))
            .await
    }

    pub async fn get_current_session(
        &self,
        institute_id: Uuid,
    ) -> Result<Option<AcademicSession>, StoreError> {
        self.repo
            .find_one(json!({
                "institute_id": institute_id,
                "is_current": true,
                "is_active": true,
                "is_deleted": false
            }))
            .await
    }

    pub async fn update_session(
        &self,
        id: Uuid,
        mut patch: Value,
    ) -> Result<Option<AcademicSession>, StoreError> {
        patch["updated_at"] = json!(Utc::now());
        self.repo.update_one(json!({ "id": id }), patch).await
    }

    /// First write of the set-current pair: clear the flag on every session
    /// of the institute.
    pub async fn unset_current_sessions(&self, institute_id: Uuid) -> Result<u64, StoreError> {
        self.repo
            .update_many(
                json!({ "institute_id": institute_id, "is_current": true }),
                json!({ "is_current": false, "updated_at": Utc::now() }),
            )
            .await
    }

    /// Second write of the set-current pair: mark the target current (and
    /// active, matching the original behavior).
    pub async fn mark_session_current(
        &self,
        id: Uuid,
    ) -> Result<Option<AcademicSession>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({ "is_current": true, "is_active": true, "updated_at": Utc::now() }),
            )
            .await
    }

    /// Soft delete; a deleted session can never remain current or active
    pub async fn delete_session(&self, id: Uuid) -> Result<Option<AcademicSession>, StoreError> {
        self.repo
            .update_one(
                json!({ "id": id }),
                json!({
                    "is_deleted": true,
                    "is_active": false,
                    "is_current": false,
                    "updated_at": Utc::now()
                }),
            )
            .await
    }

    /// The active non-deleted session whose inclusive [start, end] range
    /// contains `date`. When overlapping active sessions both contain the
    /// date, whichever the store yields first is returned; callers must not
    /// rely on which one.
    pub async fn find_session_by_date(
        &self,
        institute_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AcademicSession>, StoreError> {
        self.repo
            .find_one(json!({
                "institute_id": institute_id,
                "start_date": { "$lte": date },
                "end_date": { "$gte": date },
                "is_active": true,
                "is_deleted": false
            }))
            .await
    }

    /// Active non-deleted sessions intersecting [start, end], earliest first
    pub async fn get_sessions_in_date_range(
        &self,
        institute_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AcademicSession>, StoreError> {
        self.repo
            .find_many(
                json!({
                    "institute_id": institute_id,
                    "start_date": { "$lte": end },
                    "end_date": { "$gte": start },
                    "is_active": true,
                    "is_deleted": false
                }),
                FindOptions::sorted("start_date", SortOrder::Asc),
            )
            .await
    }
}
