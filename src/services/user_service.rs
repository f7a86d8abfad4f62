//! Principal creation flows and the login protocol.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{self, password, Claims};
use crate::database::models::{Gender, Institute, Role, SanitizedUser, User};
use crate::database::repos::{InstituteRepo, Page, Pagination, UserRepo};
use crate::error::ApiError;

/// Profile fields shared by all three creation flows.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub country_code: Option<String>,
    pub phone_no: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SanitizedUser,
    pub token: String,
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepo,
    institutes: InstituteRepo,
}

impl UserService {
    pub fn new(users: UserRepo, institutes: InstituteRepo) -> Self {
        Self { users, institutes }
    }

    /// Create an untenanted SUPER_ADMIN. A supplied institute id is a caller
    /// mistake, not something to silently drop.
    pub async fn create_super_admin(
        &self,
        input: NewUserInput,
        institute_id: Option<Uuid>,
    ) -> Result<SanitizedUser, ApiError> {
        if institute_id.is_some() {
            return Err(ApiError::invalid_request(
                "Super admin accounts are not tied to an institute",
            ));
        }

        self.create_principal(input, Role::SuperAdmin, None).await
    }

    /// Create an INSTITUTE_ADMIN for an existing, active institute. The
    /// first admin becomes the institute's owner.
    pub async fn create_institute_admin(
        &self,
        input: NewUserInput,
        institute_id: Uuid,
    ) -> Result<SanitizedUser, ApiError> {
        let institute = self.require_live_institute(institute_id).await?;

        let user = self
            .create_principal(input, Role::InstituteAdmin, Some(institute_id))
            .await?;

        if institute.owner_id.is_none() {
            self.institutes
                .update_institute(institute_id, serde_json::json!({ "owner_id": user.id }))
                .await?;
        }
        Ok(user)
    }

    /// Create a tenant-scoped user with one of the non-administrator roles.
    pub async fn create_institute_user(
        &self,
        input: NewUserInput,
        role: &str,
        institute_id: Uuid,
    ) -> Result<SanitizedUser, ApiError> {
        let role: Role = role
            .parse()
            .ok()
            .filter(|r| Role::INSTITUTE_USER_ROLES.contains(r))
            .ok_or_else(|| {
                ApiError::invalid_request(
                    "Role must be one of TEACHER, STUDENT, PARENT, STAFF, USER",
                )
            })?;

        let institute = self.require_live_institute(institute_id).await?;

        let user_count = self.users.count_users(institute_id).await?;
        if user_count >= institute.max_allowed_users as u64 {
            return Err(ApiError::forbidden(
                "Institute has reached its allowed user limit",
            ));
        }

        self.create_principal(input, role, Some(institute_id)).await
    }

    /// Login as specified: email-only lookup, state checks, hash comparison,
    /// tenant re-validation, best-effort last-login stamp, token issue.
    /// Missing email and wrong password fail identically so callers cannot
    /// probe which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .get_user_by_email_for_login(&email)
            .await?
            .ok_or_else(|| ApiError::invalid_credentials("Invalid email or password"))?;

        if user.is_deleted {
            return Err(ApiError::gone("User has been deleted"));
        }
        if !user.is_active {
            return Err(ApiError::forbidden("User account is inactive"));
        }

        if !password::verify_password(password, &user.password)? {
            return Err(ApiError::invalid_credentials("Invalid email or password"));
        }

        if let Some(institute_id) = user.institute_id {
            self.require_live_institute(institute_id).await?;
        }

        if let Err(e) = self.users.update_last_login(user.id).await {
            // stamping the login time never blocks the login itself
            tracing::warn!("Failed to record last login for {}: {}", user.id, e);
        }

        let claims = Claims::new(user.id, user.email.clone(), user.role, user.institute_id);
        let token = auth::generate_token(&claims).map_err(|e| {
            tracing::error!("Token generation failed: {}", e);
            ApiError::internal_server_error("Failed to issue authentication token")
        })?;

        tracing::info!("User {} logged in ({})", user.id, user.role);
        Ok(LoginResponse {
            user: user.sanitized(),
            token,
        })
    }

    pub async fn get_user(&self, id: Uuid) -> Result<SanitizedUser, ApiError> {
        let user = self
            .users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        if user.is_deleted {
            return Err(ApiError::gone("User has been deleted"));
        }
        Ok(user.sanitized())
    }

    pub async fn get_all_users(
        &self,
        institute_id: Uuid,
        role: Option<Role>,
        pagination: Pagination,
    ) -> Result<Page<SanitizedUser>, ApiError> {
        let page = self.users.get_all_users(institute_id, role, pagination).await?;
        Ok(sanitize_page(page))
    }

    /// Teacher/student users whose profile aggregate has not been created
    /// yet; the pool the profile-creation screens pick from.
    pub async fn get_users_without_profile(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<SanitizedUser>, ApiError> {
        let page = self
            .users
            .get_users_without_profile(institute_id, pagination)
            .await?;
        Ok(sanitize_page(page))
    }

    /// Shared tail of the three creation flows: scoped uniqueness checks,
    /// hashing, persistence, sanitized return.
    async fn create_principal(
        &self,
        input: NewUserInput,
        role: Role,
        institute_id: Option<Uuid>,
    ) -> Result<SanitizedUser, ApiError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::invalid_request("A valid email is required"));
        }
        if input.password.len() < 8 {
            return Err(ApiError::invalid_request(
                "Password must be at least 8 characters",
            ));
        }

        if self
            .users
            .get_user_by_email(&email, institute_id)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(
                "A user with this email already exists",
            ));
        }

        if let Some(phone_no) = &input.phone_no {
            if self
                .users
                .get_user_by_phone(phone_no, input.country_code.as_deref(), institute_id)
                .await?
                .is_some()
            {
                return Err(ApiError::conflict(
                    "A user with this phone number already exists",
                ));
            }
        }

        let password_hash = password::hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email,
            password: password_hash,
            country_code: input.country_code,
            phone_no: input.phone_no,
            role,
            institute_id,
            gender: input.gender,
            dob: input.dob,
            address: input.address,
            profile_url: input.profile_url,
            is_active: true,
            is_deleted: false,
            last_login: None,
            profile_id: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create_user(&user).await?;
        tracing::info!("User created: {} with role {}", created.id, created.role);
        Ok(created.sanitized())
    }

    /// The institute behind any tenanted operation must exist, not be
    /// deleted, and be active, in that order of failure.
    async fn require_live_institute(&self, institute_id: Uuid) -> Result<Institute, ApiError> {
        let institute = self
            .institutes
            .get_institute_by_id(institute_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Institute not found"))?;

        if institute.is_deleted {
            return Err(ApiError::gone("Institute has been deleted"));
        }
        if !institute.is_active {
            return Err(ApiError::forbidden("Institute is inactive"));
        }
        Ok(institute)
    }
}

fn sanitize_page(page: Page<User>) -> Page<SanitizedUser> {
    Page {
        items: page.items.iter().map(User::sanitized).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MemoryStore;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn services() -> (UserService, InstituteRepo) {
        let store = Arc::new(MemoryStore::new());
        let institutes = InstituteRepo::new(Arc::clone(&store));
        (
            UserService::new(UserRepo::new(store), institutes.clone()),
            institutes,
        )
    }

    async fn seed_institute(institutes: &InstituteRepo) -> Institute {
        let now = Utc::now();
        institutes
            .create_institute(&Institute {
                id: Uuid::new_v4(),
                name: "Springfield High".to_string(),
                code: "SPR001".to_string(),
                address: "742 Evergreen Terrace".to_string(),
                contact_email: "office@springfield.example".to_string(),
                contact_phone: "555-0100".to_string(),
                max_allowed_users: 10,
                owner_id: None,
                settings: HashMap::new(),
                is_active: true,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    fn new_user(email: &str) -> NewUserInput {
        NewUserInput {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
            country_code: None,
            phone_no: None,
            gender: None,
            dob: None,
            address: None,
            profile_url: None,
        }
    }

    #[tokio::test]
    async fn super_admin_rejects_an_institute_id() {
        let (svc, _) = services();
        let err = svc
            .create_super_admin(new_user("root@example.com"), Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn institute_user_rejects_admin_and_unknown_roles() {
        let (svc, institutes) = services();
        let institute = seed_institute(&institutes).await;

        for bad in ["ADMIN_ROOT", "SUPER_ADMIN", "INSTITUTE_ADMIN", "teacher"] {
            let err = svc
                .create_institute_user(new_user("t@example.com"), bad, institute.id)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)), "role {bad}");
        }
        // nothing was persisted by the rejected attempts
        assert!(svc
            .users
            .get_user_by_email("t@example.com", Some(institute.id))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn email_conflict_is_scoped_per_institute() {
        let (svc, institutes) = services();
        let a = seed_institute(&institutes).await;
        let b = seed_institute(&institutes).await;

        svc.create_institute_user(new_user("shared@example.com"), "TEACHER", a.id)
            .await
            .unwrap();
        // same email in another institute is allowed
        svc.create_institute_user(new_user("shared@example.com"), "TEACHER", b.id)
            .await
            .unwrap();
        // but not twice in the same one
        let err = svc
            .create_institute_user(new_user("shared@example.com"), "STUDENT", a.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn first_admin_becomes_owner() {
        let (svc, institutes) = services();
        let institute = seed_institute(&institutes).await;

        let admin = svc
            .create_institute_admin(new_user("head@example.com"), institute.id)
            .await
            .unwrap();

        let reloaded = institutes
            .get_institute_by_id(institute.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.owner_id, Some(admin.id));
    }

    #[tokio::test]
    async fn login_does_not_reveal_which_check_failed() {
        let (svc, institutes) = services();
        let institute = seed_institute(&institutes).await;
        svc.create_institute_user(new_user("asha@example.com"), "TEACHER", institute.id)
            .await
            .unwrap();

        let wrong_password = svc
            .login("asha@example.com", "not the password")
            .await
            .unwrap_err();
        let unknown_email = svc
            .login("nobody@example.com", "correct horse")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, ApiError::InvalidCredentials(_)));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn login_returns_token_and_sanitized_user() {
        let (svc, institutes) = services();
        let institute = seed_institute(&institutes).await;
        svc.create_institute_user(new_user("asha@example.com"), "TEACHER", institute.id)
            .await
            .unwrap();

        let response = svc.login("Asha@Example.com", "correct horse").await.unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.role, Role::Teacher);
        assert_eq!(response.user.institute_id, Some(institute.id));

        let body = serde_json::to_value(&response.user).unwrap();
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn login_fails_when_the_institute_went_away() {
        let (svc, institutes) = services();
        let institute = seed_institute(&institutes).await;
        svc.create_institute_user(new_user("asha@example.com"), "TEACHER", institute.id)
            .await
            .unwrap();

        institutes.delete_institute(institute.id).await.unwrap();
        let err = svc.login("asha@example.com", "correct horse").await.unwrap_err();
        assert!(matches!(err, ApiError::Gone(_)));
    }

    #[tokio::test]
    async fn user_limit_is_enforced() {
        let (svc, institutes) = services();
        let mut institute = seed_institute(&institutes).await;
        institute.max_allowed_users = 1;
        institutes
            .update_institute(institute.id, serde_json::json!({ "max_allowed_users": 1 }))
            .await
            .unwrap();

        svc.create_institute_user(new_user("one@example.com"), "TEACHER", institute.id)
            .await
            .unwrap();
        let err = svc
            .create_institute_user(new_user("two@example.com"), "TEACHER", institute.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
