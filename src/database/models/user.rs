use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles an authenticated principal can hold. `SuperAdmin` is the only
/// untenanted role; every other role requires an institute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    InstituteAdmin,
    Teacher,
    Student,
    Parent,
    Staff,
    User,
}

impl Role {
    /// Roles assignable through the generic institute-user creation flow.
    /// Admin roles are deliberately excluded; they have dedicated flows.
    pub const INSTITUTE_USER_ROLES: [Role; 5] =
        [Role::Teacher, Role::Student, Role::Parent, Role::Staff, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::InstituteAdmin => "INSTITUTE_ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
            Role::Parent => "PARENT",
            Role::Staff => "STAFF",
            Role::User => "USER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "INSTITUTE_ADMIN" => Ok(Role::InstituteAdmin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            "PARENT" => Ok(Role::Parent),
            "STAFF" => Ok(Role::Staff),
            "USER" => Ok(Role::User),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// An authenticatable principal. `institute_id` is None only for
/// `SUPER_ADMIN`; email is unique per (email, institute_id) scope.
///
/// The password hash round-trips through the store but is stripped from
/// every API representation via [`User::sanitized`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub institute_id: Option<Uuid>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    /// Linked Teacher/Student aggregate, set once on profile creation and
    /// cleared when that profile is deleted
    #[serde(default)]
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Copy of this user with the password hash blanked, safe to return to
    /// clients.
    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            country_code: self.country_code.clone(),
            phone_no: self.phone_no.clone(),
            role: self.role,
            institute_id: self.institute_id,
            gender: self.gender,
            dob: self.dob,
            address: self.address.clone(),
            profile_url: self.profile_url.clone(),
            is_active: self.is_active,
            is_deleted: self.is_deleted,
            last_login: self.last_login,
            profile_id: self.profile_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API-facing user representation; structurally a `User` minus the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizedUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country_code: Option<String>,
    pub phone_no: Option<String>,
    pub role: Role,
    pub institute_id: Option<Uuid>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_url: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::SuperAdmin,
            Role::InstituteAdmin,
            Role::Teacher,
            Role::Student,
            Role::Parent,
            Role::Staff,
            Role::User,
        ] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("ADMIN_ROOT").is_err());
        assert!(Role::from_str("teacher").is_err());
    }
}
