use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A class (grade + section) within one academic session of an institute.
/// (institute, session, name, section) is unique among non-deleted classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstituteClass {
    pub id: Uuid,
    pub institute_id: Uuid,
    pub academic_session_id: Uuid,
    pub name: String,
    pub section: String,
    #[serde(default)]
    pub student_count: i64,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
