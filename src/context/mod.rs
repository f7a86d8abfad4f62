//! Per-request context store.
//!
//! A task-local key/value store scoped to one inbound request's async call
//! chain: the context middleware opens a fresh scope per request, the
//! authorization gate populates it, and downstream logic reads the
//! authenticated identity and institute without parameter threading.
//! Concurrent requests each own their own store; nothing leaks across
//! requests, and every getter returns None outside an active scope.
//!
//! The institute id read from here is authorization-derived and must be
//! preferred over any client-supplied institute id.

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use uuid::Uuid;

use crate::database::models::{Role, User};

tokio::task_local! {
    static REQUEST_CONTEXT: ContextStore;
}

#[derive(Debug, Default)]
pub struct ContextStore {
    values: Mutex<HashMap<String, Value>>,
}

/// Run `fut` inside a fresh, empty request context.
pub async fn scope<F: Future>(fut: F) -> F::Output {
    REQUEST_CONTEXT.scope(ContextStore::default(), fut).await
}

/// Set a context value; a no-op outside any active request scope.
pub fn set(key: &str, value: Value) {
    let _ = REQUEST_CONTEXT.try_with(|store| {
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value);
        }
    });
}

/// Get a context value; None if unset or outside any active request scope.
pub fn get(key: &str) -> Option<Value> {
    REQUEST_CONTEXT
        .try_with(|store| store.values.lock().ok().and_then(|values| values.get(key).cloned()))
        .ok()
        .flatten()
}

// Typed accessors for the fields the authorization gate populates

pub fn current_user_id() -> Option<Uuid> {
    get("user_id").and_then(|v| serde_json::from_value(v).ok())
}

pub fn current_role() -> Option<Role> {
    get("role").and_then(|v| serde_json::from_value(v).ok())
}

pub fn current_institute_id() -> Option<Uuid> {
    get("institute_id").and_then(|v| serde_json::from_value(v).ok())
}

pub fn current_user() -> Option<User> {
    get("user").and_then(|v| serde_json::from_value(v).ok())
}

/// Populate the context from an authenticated user. The institute id is set
/// for every role except SUPER_ADMIN, which is untenanted.
pub fn set_auth_context(user: &User) {
    set("user_id", serde_json::json!(user.id));
    set("role", serde_json::json!(user.role));
    if let Ok(snapshot) = serde_json::to_value(user) {
        set("user", snapshot);
    }

    if user.role != Role::SuperAdmin {
        if let Some(institute_id) = user.institute_id {
            set("institute_id", serde_json::json!(institute_id));
            tracing::debug!("Institute context set: {}", institute_id);
        }
    }
}
