pub mod class_repo;
pub mod institute_repo;
pub mod session_repo;
pub mod student_repo;
pub mod teacher_repo;
pub mod user_repo;

pub use class_repo::ClassRepo;
pub use institute_repo::InstituteRepo;
pub use session_repo::SessionRepo;
pub use student_repo::StudentRepo;
pub use teacher_repo::TeacherRepo;
pub use user_repo::UserRepo;

/// Page-number pagination shared by every listing endpoint
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.unwrap_or(defaults.page).max(1),
            limit: limit.unwrap_or(defaults.limit).clamp(1, 100),
        }
    }

    pub fn skip(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: usize,
    pub limit: usize,
}
