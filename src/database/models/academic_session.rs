use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded academic period owned by exactly one institute.
///
/// Invariants enforced by the session service: start_date < end_date,
/// duration within [30, 730] days, at most one `is_current` per institute.
/// Overlapping active sessions are allowed (the current flag disambiguates
/// which one is authoritative) unless the overlap policy says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicSession {
    pub id: Uuid,
    pub institute_id: Uuid,
    /// e.g. "2024-2025" or "Spring 2024"; unique per institute
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AcademicSession {
    pub fn duration_days(&self) -> i64 {
        crate::dates::days_between(self.start_date, self.end_date)
    }
}
