//! Academic session business rules.
//!
//! Owns the session state machine for each institute: date-range validation,
//! overlap detection, and the single-current-session invariant. All writes
//! to the session collection go through this service.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::config::{self, OverlapPolicy};
use crate::database::models::AcademicSession;
use crate::database::repos::SessionRepo;
use crate::dates;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSessionInput {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct AcademicSessionService {
    sessions: SessionRepo,
}

impl AcademicSessionService {
    pub fn new(sessions: SessionRepo) -> Self {
        Self { sessions }
    }

    /// Create a session: validate the date range, reject duplicate names,
    /// apply the overlap policy, and hand over the current flag when
    /// requested.
    pub async fn create_session(
        &self,
        institute_id: Uuid,
        input: CreateSessionInput,
    ) -> Result<AcademicSession, ApiError> {
        dates::validate_date_range(input.start_date, input.end_date)?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::invalid_request("Session name is required"));
        }
        if self
            .sessions
            .get_session_by_name(institute_id, &name)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(
                "An academic session with this name already exists",
            ));
        }

        self.check_overlap(institute_id, input.start_date, input.end_date, None)
            .await?;

        if input.is_current {
            // Unset-all then persist-with-current keeps at most one current
            // session per institute. The two writes are not transactional; a
            // racing set_current can transiently leave zero current sessions,
            // healed by the next set_current.
            self.sessions.unset_current_sessions(institute_id).await?;
        }

        let now = Utc::now();
        let session = AcademicSession {
            id: Uuid::new_v4(),
            institute_id,
            name,
            start_date: input.start_date,
            end_date: input.end_date,
            is_current: input.is_current,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.sessions.create_session(&session).await?;
        tracing::info!(
            "Academic session created: {} ({} to {}) for institute {}",
            created.name,
            created.start_date,
            created.end_date,
            institute_id
        );
        Ok(created)
    }

    /// Patch a session. Date changes re-run full range validation on the
    /// merged values; a current=true patch runs the unset-all handover
    /// before the patch lands.
    pub async fn update_session(
        &self,
        institute_id: Uuid,
        session_id: Uuid,
        input: UpdateSessionInput,
    ) -> Result<AcademicSession, ApiError> {
        let existing = self.load_owned(institute_id, session_id).await?;

        let start = input.start_date.unwrap_or(existing.start_date);
        let end = input.end_date.unwrap_or(existing.end_date);
        if input.start_date.is_some() || input.end_date.is_some() {
            dates::validate_date_range(start, end)?;
            self.check_overlap(institute_id, start, end, Some(session_id))
                .await?;
        }

        let mut patch = json!({});
        if let Some(name) = &input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ApiError::invalid_request("Session name is required"));
            }
            if name != existing.name {
                if let Some(other) = self.sessions.get_session_by_name(institute_id, name).await? {
                    if other.id != session_id {
                        return Err(ApiError::conflict(
                            "An academic session with this name already exists",
                        ));
                    }
                }
            }
            patch["name"] = json!(name);
        }
        if input.start_date.is_some() {
            patch["start_date"] = json!(start);
        }
        if input.end_date.is_some() {
            patch["end_date"] = json!(end);
        }
        if let Some(is_active) = input.is_active {
            patch["is_active"] = json!(is_active);
            if !is_active {
                // an inactive session cannot stay authoritative
                patch["is_current"] = json!(false);
            }
        }
        if let Some(is_current) = input.is_current {
            if is_current {
                self.sessions.unset_current_sessions(institute_id).await?;
            }
            patch["is_current"] = json!(is_current);
        }

        self.sessions
            .update_session(session_id, patch)
            .await?
            .ok_or_else(|| ApiError::not_found("Academic session not found"))
    }

    /// Make `session_id` the institute's single current session.
    pub async fn set_current(
        &self,
        institute_id: Uuid,
        session_id: Uuid,
    ) -> Result<AcademicSession, ApiError> {
        self.load_owned(institute_id, session_id).await?;

        self.sessions.unset_current_sessions(institute_id).await?;
        let updated = self
            .sessions
            .mark_session_current(session_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Academic session not found"))?;

        tracing::info!(
            "Current academic session for institute {} is now {}",
            institute_id,
            updated.name
        );
        Ok(updated)
    }

    pub async fn delete_session(
        &self,
        institute_id: Uuid,
        session_id: Uuid,
    ) -> Result<AcademicSession, ApiError> {
        self.load_owned(institute_id, session_id).await?;
        self.sessions
            .delete_session(session_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Academic session not found"))
    }

    pub async fn get_session(
        &self,
        institute_id: Uuid,
        session_id: Uuid,
    ) -> Result<AcademicSession, ApiError> {
        self.load_owned(institute_id, session_id).await
    }

    pub async fn get_all_sessions(
        &self,
        institute_id: Uuid,
        is_current: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Vec<AcademicSession>, ApiError> {
        Ok(self
            .sessions
            .get_all_sessions(institute_id, is_current, is_active)
            .await?)
    }

    /// The institute's current session, if one is set.
    pub async fn get_current_session(
        &self,
        institute_id: Uuid,
    ) -> Result<Option<AcademicSession>, ApiError> {
        Ok(self.sessions.get_current_session(institute_id).await?)
    }

    /// The active session containing `date`, if any. With overlapping active
    /// sessions the store's first match wins.
    pub async fn find_session_by_date(
        &self,
        institute_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AcademicSession>, ApiError> {
        Ok(self.sessions.find_session_by_date(institute_id, date).await?)
    }

    pub async fn get_sessions_in_date_range(
        &self,
        institute_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AcademicSession>, ApiError> {
        Ok(self
            .sessions
            .get_sessions_in_date_range(institute_id, start, end)
            .await?)
    }

    /// Compare `[start, end]` against every other active session of the
    /// institute and apply the configured overlap policy. Overlap is allowed
    /// with a warning by default; the current flag disambiguates which
    /// overlapping session is authoritative.
    async fn check_overlap(
        &self,
        institute_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<(), ApiError> {
        let active = self
            .sessions
            .get_all_sessions(institute_id, None, Some(true))
            .await?;

        for other in active {
            if Some(other.id) == exclude {
                continue;
            }
            if dates::ranges_overlap(start, end, other.start_date, other.end_date) {
                match config::config().sessions.overlap_policy {
                    OverlapPolicy::Warn => {
                        tracing::warn!(
                            "Session range {} to {} overlaps existing session '{}' ({} to {}) for institute {}",
                            start,
                            end,
                            other.name,
                            other.start_date,
                            other.end_date,
                            institute_id
                        );
                    }
                    OverlapPolicy::Reject => {
                        return Err(ApiError::conflict(format!(
                            "Session dates overlap existing session '{}'",
                            other.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Load a session, scoped to the institute. Missing or foreign sessions
    /// are NotFound; soft-deleted ones are Gone.
    async fn load_owned(
        &self,
        institute_id: Uuid,
        session_id: Uuid,
    ) -> Result<AcademicSession, ApiError> {
        let session = self
            .sessions
            .get_session_by_id(session_id)
            .await?
            .filter(|s| s.institute_id == institute_id)
            .ok_or_else(|| ApiError::not_found("Academic session not found"))?;

        if session.is_deleted {
            return Err(ApiError::gone("Academic session has been deleted"));
        }
        Ok(session)
    }
}
