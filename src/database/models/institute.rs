use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An institute: the unit of tenant isolation. The code is globally unique
/// and stored uppercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institute {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub address: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(default = "default_max_allowed_users")]
    pub max_allowed_users: u32,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub settings: HashMap<String, String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_max_allowed_users() -> u32 {
    10
}
