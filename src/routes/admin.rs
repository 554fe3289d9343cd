use axum::Router;

use crate::AppState;

use super::shell;

/// Admin Router Module
///
/// Owns the paths restricted exclusively to the `admin` role. The admin
/// guard is the simplest in the pipeline: admin renders, everyone else is
/// sent to `/dashboard`. Onboarding flags are irrelevant here; an admin
/// account never runs the patient onboarding sequence.

/// Admin home: platform statistics and moderation entry points.
pub const ADMIN_HOME: &str = "/admin";
/// User management screen (role changes, account resets).
pub const ADMIN_USERS: &str = "/admin/users";

/// Whether `path` lives under the admin area.
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_HOME || path.starts_with("/admin/")
}

/// admin_routes
///
/// View shells for the admin area. The role check happens in the guard layer
/// above this router; the handlers assume it already passed.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(ADMIN_HOME, shell("admin-dashboard"))
        .route(ADMIN_USERS, shell("admin-users"))
}
