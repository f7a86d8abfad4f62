use std::sync::Arc;

use crate::database::repos::{
    ClassRepo, InstituteRepo, SessionRepo, StudentRepo, TeacherRepo, UserRepo,
};
use crate::database::store::MemoryStore;
use crate::services::{
    AcademicSessionService, InstituteClassService, InstituteService, StudentService,
    TeacherService, UserService,
};

/// Shared application state handed to every handler and the auth gate.
///
/// All repositories and services are thin wrappers over the same store,
/// so cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    pub fn user_repo(&self) -> UserRepo {
        UserRepo::new(self.store())
    }

    pub fn institute_repo(&self) -> InstituteRepo {
        InstituteRepo::new(self.store())
    }

    pub fn session_repo(&self) -> SessionRepo {
        SessionRepo::new(self.store())
    }

    pub fn class_repo(&self) -> ClassRepo {
        ClassRepo::new(self.store())
    }

    pub fn student_repo(&self) -> StudentRepo {
        StudentRepo::new(self.store())
    }

    pub fn teacher_repo(&self) -> TeacherRepo {
        TeacherRepo::new(self.store())
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.user_repo(), self.institute_repo())
    }

    pub fn institute_service(&self) -> InstituteService {
        InstituteService::new(self.institute_repo(), self.user_repo())
    }

    pub fn session_service(&self) -> AcademicSessionService {
        AcademicSessionService::new(self.session_repo())
    }

    pub fn class_service(&self) -> InstituteClassService {
        InstituteClassService::new(self.class_repo(), self.session_repo())
    }

    pub fn student_service(&self) -> StudentService {
        StudentService::new(self.student_repo(), self.user_repo(), self.class_repo())
    }

    pub fn teacher_service(&self) -> TeacherService {
        TeacherService::new(self.teacher_repo(), self.user_repo())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
