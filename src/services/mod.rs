pub mod academic_session_service;
pub mod institute_class_service;
pub mod institute_service;
pub mod student_service;
pub mod teacher_service;
pub mod user_service;

pub use academic_session_service::AcademicSessionService;
pub use institute_class_service::InstituteClassService;
pub use institute_service::InstituteService;
pub use student_service::StudentService;
pub use teacher_service::TeacherService;
pub use user_service::UserService;
