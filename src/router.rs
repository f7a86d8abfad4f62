//! Route table: every protected route is wired through [`guarded`] with the
//! capability it requires; the context scope wraps everything, public routes
//! included.

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{academic_session, institute, institute_class, student, teacher, user};
use crate::middleware::authorize::{context_middleware, guarded};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/v1/user", user_routes(state.clone()))
        .nest("/v1/institute", institute_routes(state.clone()))
        .nest("/v1/academic-session", session_routes(state.clone()))
        .nest("/v1/instituteClass", class_routes(state.clone()))
        .nest("/v1/student", student_routes(state.clone()))
        .nest("/v1/teacher", teacher_routes(state.clone()))
        .layer(axum::middleware::from_fn(context_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(user::login))
        .route(
            "/create-super-admin",
            guarded(
                state.clone(),
                "CREATE_INSTITUTE_ADMIN",
                post(user::create_super_admin),
            ),
        )
        .route(
            "/create-institute-admin",
            guarded(
                state.clone(),
                "CREATE_INSTITUTE_ADMIN",
                post(user::create_institute_admin),
            ),
        )
        .route(
            "/create-institute-user",
            guarded(state.clone(), "CREATE_USER", post(user::create_institute_user)),
        )
        .route(
            "/get-all-users",
            guarded(state.clone(), "GET_INSTITUTE_USERS", get(user::get_all_users)),
        )
        .route(
            "/get-users-without-profile",
            guarded(
                state,
                "GET_INSTITUTE_USERS",
                get(user::get_users_without_profile),
            ),
        )
}

fn institute_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create-new-institute",
            guarded(
                state.clone(),
                "CREATE_NEW_INSTITUTES",
                post(institute::create_institute),
            ),
        )
        .route(
            "/get-all-institute",
            guarded(
                state.clone(),
                "GET_ALL_INSTITUTES",
                get(institute::get_all_institutes),
            ),
        )
        .route(
            "/:id/get-institute-details",
            guarded(
                state.clone(),
                "GET_INSTITUTE_BY_ID",
                get(institute::get_institute_details),
            ),
        )
        .route(
            "/:id/update-institute",
            guarded(
                state.clone(),
                "UPDATE_INSTITUTE",
                patch(institute::update_institute),
            ),
        )
        .route(
            "/:id/delete-institute",
            guarded(
                state.clone(),
                "DELETE_INSTITUTE",
                delete(institute::delete_institute),
            ),
        )
        .route(
            "/:id/admins",
            guarded(
                state,
                "GET_INSTITUTE_BY_ID",
                get(institute::get_institute_admins),
            ),
        )
}

fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create",
            guarded(state.clone(), "CREATE_USER", post(academic_session::create_session)),
        )
        .route(
            "/get-all",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(academic_session::get_all_sessions),
            ),
        )
        .route(
            "/get-current",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(academic_session::get_current_session),
            ),
        )
        .route(
            "/find-by-date",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(academic_session::find_session_by_date),
            ),
        )
        .route(
            "/in-range",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(academic_session::get_sessions_in_range),
            ),
        )
        .route(
            "/:id/get-details",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(academic_session::get_session_details),
            ),
        )
        .route(
            "/:id/update",
            guarded(state.clone(), "UPDATE_USER", patch(academic_session::update_session)),
        )
        .route(
            "/:id/set-current",
            guarded(
                state.clone(),
                "UPDATE_USER",
                patch(academic_session::set_current_session),
            ),
        )
        .route(
            "/:id/delete",
            guarded(state, "DELETE_USER", delete(academic_session::delete_session)),
        )
}

fn class_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create-class",
            guarded(state.clone(), "CREATE_CLASS", post(institute_class::create_class)),
        )
        .route(
            "/get-all-classes",
            guarded(state.clone(), "GET_CLASSES", get(institute_class::get_all_classes)),
        )
        .route(
            "/:id/get-class-details",
            guarded(
                state.clone(),
                "GET_CLASSES",
                get(institute_class::get_class_details),
            ),
        )
        .route(
            "/:id/update-class",
            guarded(state.clone(), "UPDATE_CLASS", put(institute_class::update_class)),
        )
        .route(
            "/:id/delete-class",
            guarded(state, "DELETE_CLASS", delete(institute_class::delete_class)),
        )
}

fn student_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create-student",
            guarded(state.clone(), "CREATE_USER", post(student::create_student)),
        )
        .route(
            "/get-all-students",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(student::get_all_students),
            ),
        )
        .route(
            "/:id/get-student",
            guarded(state.clone(), "GET_INSTITUTE_USERS", get(student::get_student)),
        )
        .route(
            "/:id/delete-student",
            guarded(state, "DELETE_USER", delete(student::delete_student)),
        )
}

fn teacher_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create-teacher",
            guarded(state.clone(), "CREATE_USER", post(teacher::create_teacher)),
        )
        .route(
            "/get-all-teachers",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(teacher::get_all_teachers),
            ),
        )
        .route(
            "/:id/get-teacher-details",
            guarded(
                state.clone(),
                "GET_INSTITUTE_USERS",
                get(teacher::get_teacher_details),
            ),
        )
        .route(
            "/:id/delete-teacher",
            guarded(state, "DELETE_USER", delete(teacher::delete_teacher)),
        )
}

async fn root() -> axum::Json<Value> {
    axum::Json(json!({
        "name": "institute-api-rust",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    }))
}

async fn health() -> axum::Json<Value> {
    axum::Json(json!({ "status": "healthy" }))
}
