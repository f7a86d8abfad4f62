//! Static role → capability table.
//!
//! This is intentionally data, not code: granting a role a new capability is
//! a table edit, never a logic change. Roles absent from the table (PARENT,
//! STAFF, USER) hold no capabilities.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::database::models::Role;

static ROLES: Lazy<HashMap<Role, &'static [&'static str]>> = Lazy::new(|| {
    let mut table: HashMap<Role, &'static [&'static str]> = HashMap::new();

    table.insert(
        Role::SuperAdmin,
        &[
            "CREATE_NEW_INSTITUTES",
            "GET_ALL_INSTITUTES",
            "GET_INSTITUTE_BY_ID",
            "UPDATE_INSTITUTE",
            "DELETE_INSTITUTE",
            "CREATE_INSTITUTE_ADMIN",
            "GET_ALL_USERS",
            "UPDATE_USER_STATUS",
        ],
    );

    table.insert(
        Role::InstituteAdmin,
        &[
            "GET_MY_INSTITUTE",
            "UPDATE_MY_INSTITUTE",
            "CREATE_USER",
            "GET_INSTITUTE_USERS",
            "UPDATE_USER",
            "DELETE_USER",
            "CREATE_CLASS",
            "GET_CLASSES",
            "UPDATE_CLASS",
            "DELETE_CLASS",
        ],
    );

    table.insert(
        Role::Teacher,
        &["GET_MY_PROFILE", "GET_MY_STUDENTS", "GET_CLASSES"],
    );

    table.insert(Role::Student, &["GET_MY_PROFILE", "GET_CLASSES"]);

    table
});

/// Whether `role` holds `capability`. Total: never panics, roles without a
/// table row yield false for everything.
pub fn has_permission(role: Role, capability: &str) -> bool {
    ROLES
        .get(&role)
        .map(|caps| caps.contains(&capability))
        .unwrap_or(false)
}
