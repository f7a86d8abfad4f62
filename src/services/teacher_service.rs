//! Teacher profile aggregates, linked one-to-one to TEACHER users.
//! Mirrors the student linkage protocol with an employee number instead of
//! an admission number.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{Role, Teacher, User};
use crate::database::repos::{Page, Pagination, TeacherRepo, UserRepo};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CreateTeacherInput {
    pub user_id: Uuid,
    pub employee_number: String,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct TeacherService {
    teachers: TeacherRepo,
    users: UserRepo,
}

impl TeacherService {
    pub fn new(teachers: TeacherRepo, users: UserRepo) -> Self {
        Self { teachers, users }
    }

    pub async fn create_teacher(
        &self,
        institute_id: Uuid,
        input: CreateTeacherInput,
    ) -> Result<Teacher, ApiError> {
        let user = self.require_linkable_user(institute_id, input.user_id).await?;

        let employee_number = input.employee_number.trim().to_string();
        if employee_number.is_empty() {
            return Err(ApiError::invalid_request("Employee number is required"));
        }
        if self
            .teachers
            .get_teacher_by_employee_number(institute_id, &employee_number)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(
                "A teacher with this employee number already exists",
            ));
        }

        let now = Utc::now();
        let teacher = Teacher {
            id: Uuid::new_v4(),
            user_id: user.id,
            institute_id,
            employee_number,
            qualification: input.qualification,
            specialization: input.specialization,
            joining_date: input.joining_date,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.teachers.create_teacher(&teacher).await?;
        self.users.set_profile_id(user.id, Some(created.id)).await?;

        tracing::info!(
            "Teacher profile {} created for user {}",
            created.id,
            user.id
        );
        Ok(created)
    }

    pub async fn get_teacher(
        &self,
        institute_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<Teacher, ApiError> {
        self.teachers
            .get_teacher_by_id(teacher_id)
            .await?
            .filter(|t| t.institute_id == institute_id)
            .ok_or_else(|| ApiError::not_found("Teacher not found"))
    }

    pub async fn get_all_teachers(
        &self,
        institute_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Teacher>, ApiError> {
        Ok(self.teachers.get_all_teachers(institute_id, pagination).await?)
    }

    pub async fn delete_teacher(
        &self,
        institute_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<Teacher, ApiError> {
        let teacher = self.get_teacher(institute_id, teacher_id).await?;

        let deleted = self
            .teachers
            .delete_teacher(teacher.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Teacher not found"))?;

        self.users.set_profile_id(teacher.user_id, None).await?;
        Ok(deleted)
    }

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
        if user.role != Role::Teacher {
            return Err(ApiError::invalid_request(
                "User must have the TEACHER role to get a teacher profile",
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

    fn service() -> (TeacherService, UserRepo) {
        let store = Arc::new(MemoryStore::new());
        let users = UserRepo::new(Arc::clone(&store));
        (
            TeacherService::new(TeacherRepo::new(store), users.clone()),
            users,
        )
    }

    async fn seed_user(users: &UserRepo, institute_id: Uuid, role: Role) -> User {
        let now = Utc::now();
        users
            .create_user(&User {
                id: Uuid::new_v4(),
                first_name: "Meera".to_string(),
                last_name: "Iyer".to_string(),
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

    fn input(user_id: Uuid, employee_number: &str) -> CreateTeacherInput {
        CreateTeacherInput {
            user_id,
            employee_number: employee_number.to_string(),
            qualification: None,
            specialization: None,
            joining_date: None,
        }
    }

    #[tokio::test]
    async fn creating_links_the_user_profile() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Teacher).await;

        let teacher = svc
            .create_teacher(institute, input(user.id, "EMP-001"))
            .await
            .unwrap();

        let linked = users.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(linked.profile_id, Some(teacher.id));
    }

    #[tokio::test]
    async fn cross_institute_linking_is_forbidden() {
        let (svc, users) = service();
        let user = seed_user(&users, Uuid::new_v4(), Role::Teacher).await;

        let err = svc
            .create_teacher(Uuid::new_v4(), input(user.id, "EMP-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn employee_number_is_unique_per_institute() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let first = seed_user(&users, institute, Role::Teacher).await;
        let second = seed_user(&users, institute, Role::Teacher).await;

        svc.create_teacher(institute, input(first.id, "EMP-001"))
            .await
            .unwrap();
        let err = svc
            .create_teacher(institute, input(second.id, "EMP-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_unlinks_the_user() {
        let (svc, users) = service();
        let institute = Uuid::new_v4();
        let user = seed_user(&users, institute, Role::Teacher).await;

        let teacher = svc
            .create_teacher(institute, input(user.id, "EMP-001"))
            .await
            .unwrap();
        svc.delete_teacher(institute, teacher.id).await.unwrap();

        let unlinked = users.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(unlinked.profile_id, None);
    }
}
