//! Student profile aggregates, linked one-to-one to STUDENT users.

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Role, Student, User};
use crate::database::repos::{ClassRepo, Page, Pagination, StudentRepo, UserRepo};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    pub user_id: Uuid,
    pub admission_number: String,
    pub current_class_id: Option<Uuid>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Clone)]
pub struct StudentService {
    students: StudentRepo,
    users: UserRepo,
    classes: ClassRepo,
}

impl StudentService {
    pub fn new(students: StudentRepo, users: UserRepo, classes: ClassRepo) -> Self {
        Self {
            students,
            users,
            classes,
        }
    }

    /// Create the student aggregate for an existing STUDENT user, link it
    /// through the user's profile_id, and count the student into the class
    /// when one is given.
    pub async fn create_student(
        &self,
        institute_id: Uuid,
        input: CreateStudentInput,
    ) -> Result<Student, ApiError> {
        let user = self.require_linkable_user(institute_id, input.user_id).await?;

        let admission_number = input.admission_number.trim().to_string();
        if admission_number.is_empty() {
            return Err(ApiError::invalid_request("Admission number is required"));
        }
        if self
            .students
            .get_student_by_admission_number(institute_id, &admission_number)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(
                "A student with this admission number already exists",
            ));
        }

        if let Some(class_id) = input.current_class_id {
            self.classes
                .get_class_by_id(class_id)
                .await?
                .filter(|c| c.institute_id == institute_id && !c.is_deleted)
                .ok_or_else(|| ApiError::not_found("Class not found"))?;
        }

        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            user_id: user.id,
            institute_id,
            admission_number,
            current_class_id: input.current_class_id,
            guardian_name: input.guardian_name,
            guardian_phone: input.guardian_phone,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.students.create_student(&student).await?;
        self.users.set_profile_id(user.id, Some(created.id)).await?;
        if let Some(class_id) = created.current_class_id {
            self.classes.adjust_student_count(class_id, 1).await?;
        }

        tracing::info!(
            "Student profile {} created for user {}",
            created.id,
            user.id
        );
        Ok(created)
    }

    pub async fn get_student(
        &self,
        institute_id: Uuid,
        student_id: Uuid,
    ) -> Result<Student, ApiError> {
        self.students
            .get_student_by_id(student_id)
            .await?
            .filter(|s| s.institute_id == institute_id)
            .ok_or_else(|| ApiError::not_found("Student not found"))
    }

    pub async fn get_all_students(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Student>, ApiError> {
        Ok(self.students.get_all_students(institute_id, pagination).await?)
    }

    /// Soft-delete the profile, unlink the user, and count the student out
    /// of their class.
    pub async fn delete_student(
        &self,
        institute_id: Uuid,
        student_id: Uuid,
    ) -> Result<Student, ApiError> {
        let student = self.get_student(institute_id, student_id).await?;

        let deleted = self
            .students
            .delete_student(student.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student not found"))?;

        self.users.set_profile_id(student.user_id, None).await?;
        if let Some(class_id) = student.current_class_id {
            self.classes.adjust_student_count(class_id, -1).await?;
        }
        Ok(deleted)
    }

    /// The user behind a new student profile must exist, be live, hold the
    /// STUDENT role, belong to this institute, and be unlinked.
    async fn require_linkable_user(
        &self,
        institute_id: Uuid,
        user_id: Uuid,
    ) -> Result<User, ApiError> {
        let user = self
            .users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if user.is_deleted {
            return Err(ApiError::gone("User has been deleted"));
        }
        if user.role != Role::Student {
            return Err(ApiError::invalid_request(
                "User must have the STUDENT role to get a student profile",
            ));
        }
        if user.institute_id != Some(institute_id) {
            return Err(ApiError::forbidden("User belongs to a different institute"));
        }
        if user.profile_id.is_some() {
            return Err(ApiError::conflict("User already has a linked profile"));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> (StudentService, UserRepo) {
        let store = Arc::new(MemoryStore::new());
        let users = UserRepo::new(Arc::clone(&store));
        (
            StudentService::new(
                StudentRepo::new(Arc::clone(&store)),
                users.clone(),
                ClassRepo::new(store),
            ),
            users,
        )
    }

    async fn seed_user(users: &UserRepo, institute_id: Uuid, role: Role) -> User {
        let now = Utc::now();
        users
            .create_user(&User {
                id: Uuid::new_v4(),
                first_name: "Ravi".to_string(),
                last_name: "Nair".to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
                password: "hash".to_string(),
                country_code: None,
                phone_no: None,
                role,
                institute_id: Some(institute_id),
                gender: None,
                dob: None,
                address: None,
                profile_url: None,
                is_active: true,
                is_deleted: false,
                last_login: None,
                profile_id: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    fn input(user_id: Uuid, admission_number: &str) -> CreateStudentInput {
        CreateStudentInput {
            user_id,
            admission_number: admission_number.to_string(),
            current_class_id: None,
            guardian_name: None,
            guardian_phone: None,
        }
    }

    #[tokio::test]
    async fn creating_links_the_user_profile() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Student).await;

        let student = svc
            .create_student(institute, input(user.id, "ADM-001"))
            .await
            .unwrap();

        let linked = users.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(linked.profile_id, Some(student.id));
    }

    #[tokio::test]
    async fn wrong_role_is_rejected() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Teacher).await;

        let err = svc
            .create_student(institute, input(user.id, "ADM-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn a_user_gets_at_most_one_profile() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Student).await;

        svc.create_student(institute, input(user.id, "ADM-001"))
            .await
            .unwrap();
        let err = svc
            .create_student(institute, input(user.id, "ADM-002"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn admission_number_is_unique_per_institute() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let first = seed_user(&users, institute, Role::Student).await;
        let second = seed_user(&users, institute, Role::Student).await;

        svc.create_student(institute, input(first.id, "ADM-001"))
            .await
            .unwrap();
        let err = svc
            .create_student(institute, input(second.id, "ADM-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_unlinks_and_frees_the_user() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Student).await;

        let student = svc
            .create_student(institute, input(user.id, "ADM-001"))
            .await
            .unwrap();
        svc.delete_student(institute, student.id).await.unwrap();

        let unlinked = users.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(unlinked.profile_id, None);

        // the user can be linked to a fresh profile afterwards
        svc.create_student(institute, input(user.id, "ADM-002"))
            .await
            .unwrap();
    }
}
