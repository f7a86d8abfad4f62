//! Institute (tenant) management rules.

use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Institute, Role, SanitizedUser, User};
use crate::database::repos::{InstituteRepo, Page, Pagination, UserRepo};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CreateInstituteInput {
    pub name: String,
    pub code: String,
    pub address: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub max_allowed_users: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateInstituteInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub max_allowed_users: Option<u32>,
    pub is_active: Option<bool>,
    pub settings: Option<HashMap<String, String>>,
}

#[derive(Clone)]
pub struct InstituteService {
    institutes: InstituteRepo,
    users: UserRepo,
}

impl InstituteService {
    pub fn new(institutes: InstituteRepo, users: UserRepo) -> Self {
        Self { institutes, users }
    }

    /// Create an institute. The code is normalized to uppercase and must be
    /// globally unique among non-deleted institutes.
    pub async fn create_institute(
        &self,
        input: CreateInstituteInput,
    ) -> Result<Institute, ApiError> {
        let code = input.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ApiError::invalid_request("Institute code is required"));
        }
        if input.name.trim().is_empty() {
            return Err(ApiError::invalid_request("Institute name is required"));
        }

        if self.institutes.get_institute_by_code(&code).await?.is_some() {
            return Err(ApiError::conflict(
                "An institute with this code already exists",
            ));
        }

        let now = Utc::now();
        let institute = Institute {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            code,
            address: input.address,
            contact_email: input.contact_email.trim().to_lowercase(),
            contact_phone: input.contact_phone,
            max_allowed_users: input.max_allowed_users.unwrap_or(10),
            owner_id: None,
            settings: HashMap::new(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.institutes.create_institute(&institute).await?;
        tracing::info!("Institute created: {} ({})", created.name, created.code);
        Ok(created)
    }

    pub async fn get_institute(&self, id: Uuid) -> Result<Institute, ApiError> {
        let institute = self
            .institutes
            .get_institute_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Institute not found"))?;
        if institute.is_deleted {
            return Err(ApiError::gone("Institute has been deleted"));
        }
        Ok(institute)
    }

    pub async fn update_institute(
        &self,
        id: Uuid,
        input: UpdateInstituteInput,
    ) -> Result<Institute, ApiError> {
        self.get_institute(id).await?;

        let mut patch = json!({});
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(ApiError::invalid_request("Institute name is required"));
            }
            patch["name"] = json!(name.trim());
        }
        if let Some(address) = input.address {
            patch["address"] = json!(address);
        }
        if let Some(contact_email) = input.contact_email {
            patch["contact_email"] = json!(contact_email.trim().to_lowercase());
        }
        if let Some(contact_phone) = input.contact_phone {
            patch["contact_phone"] = json!(contact_phone);
        }
        if let Some(max_allowed_users) = input.max_allowed_users {
            patch["max_allowed_users"] = json!(max_allowed_users);
        }
        if let Some(is_active) = input.is_active {
            patch["is_active"] = json!(is_active);
        }
        if let Some(settings) = input.settings {
            patch["settings"] = json!(settings);
        }

        self.institutes
            .update_institute(id, patch)
            .await?
            .ok_or_else(|| ApiError::not_found("Institute not found"))
    }

    pub async fn delete_institute(&self, id: Uuid) -> Result<Institute, ApiError> {
        self.get_institute(id).await?;
        self.institutes
            .delete_institute(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Institute not found"))
    }

    pub async fn get_all_institutes(
        &self,
        pagination: Pagination,
    ) -> Result<Page<Institute>, ApiError> {
        Ok(self.institutes.get_all_institutes(pagination).await?)
    }

    /// The institute's admin accounts, password hashes stripped.
    pub async fn get_institute_admins(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<SanitizedUser>, ApiError> {
        self.get_institute(institute_id).await?;
        let page = self
            .users
            .get_all_users(institute_id, Some(Role::InstituteAdmin), pagination)
            .await?;
        Ok(Page {
            items: page.items.iter().map(User::sanitized).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> InstituteService {
        let store = Arc::new(MemoryStore::new());
        InstituteService::new(
            InstituteRepo::new(Arc::clone(&store)),
            UserRepo::new(store),
        )
    }

    fn input(code: &str) -> CreateInstituteInput {
        CreateInstituteInput {
            name: "Springfield High".to_string(),
            code: code.to_string(),
            address: "742 Evergreen Terrace".to_string(),
            contact_email: "Office@Springfield.example".to_string(),
            contact_phone: "555-0100".to_string(),
            max_allowed_users: None,
        }
    }

    #[tokio::test]
    async fn code_is_normalized_and_unique() {
        let svc = service();
        let created = svc.create_institute(input(" spr001 ")).await.unwrap();
        assert_eq!(created.code, "SPR001");
        assert_eq!(created.contact_email, "office@springfield.example");

        // same code in any casing collides
        let err = svc.create_institute(input("Spr001")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleted_institute_reads_as_gone() {
        let svc = service();
        let created = svc.create_institute(input("SPR001")).await.unwrap();
        svc.delete_institute(created.id).await.unwrap();

        let err = svc.get_institute(created.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Gone(_)));

        // the code is free for reuse after deletion
        svc.create_institute(input("SPR001")).await.unwrap();
    }

    #[tokio::test]
    async fn listing_excludes_deleted_institutes() {
        let svc = service();
        let a = svc.create_institute(input("AAA")).await.unwrap();
        svc.create_institute(input("BBB")).await.unwrap();
        svc.delete_institute(a.id).await.unwrap();

        let page = svc.get_all_institutes(Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].code, "BBB");
    }
}
