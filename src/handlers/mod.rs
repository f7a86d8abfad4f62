pub mod academic_session;
pub mod institute;
pub mod institute_class;
pub mod student;
pub mod teacher;
pub mod user;

use serde::Deserialize;
use uuid::Uuid;

use crate::context;
use crate::database::repos::Pagination;
use crate::error::ApiError;

/// Shared page/limit query parameters for listing endpoints
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// Resolve the institute every tenant-scoped operation works under.
///
/// The authorization context wins over anything the client sent; the
/// explicit parameter only matters for SUPER_ADMIN flows, which carry no
/// institute in their context. With neither, the operation stops before
/// touching storage.
pub fn resolve_institute(explicit: Option<Uuid>) -> Result<Uuid, ApiError> {
    context::current_institute_id()
        .or(explicit)
        .ok_or_else(|| ApiError::tenant_required("No institute scope for this operation"))
}
