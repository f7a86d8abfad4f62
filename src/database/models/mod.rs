pub mod academic_session;
pub mod institute;
pub mod institute_class;
pub mod student;
pub mod teacher;
pub mod user;

pub use academic_session::AcademicSession;
pub use institute::Institute;
pub use institute_class::InstituteClass;
pub use student::Student;
pub use teacher::Teacher;
pub use user::{Gender, Role, SanitizedUser, User};
