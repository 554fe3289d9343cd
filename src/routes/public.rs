use axum::Router;

use crate::AppState;

use super::shell;

/// Public Router Module
///
/// Owns the paths reachable without authentication. Two of them, `/login`
/// and `/register`, are **public-only**: an already-authenticated user
/// navigating there is redirected to their role home instead, so a logged-in
/// patient never sees the login form again.

/// Landing page, rendered for everyone.
pub const LANDING: &str = "/";
/// Login form. Public-only.
pub const LOGIN: &str = "/login";
/// Registration form. Public-only.
pub const REGISTER: &str = "/register";

/// Whether `path` is one of the public-only gateway paths.
pub fn is_public_only(path: &str) -> bool {
    path == LOGIN || path == REGISTER
}

/// public_routes
///
/// The public view shells, plus the unauthenticated health endpoint used by
/// monitoring and load balancer checks.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", axum::routing::get(|| async { "ok" }))
        .route(LANDING, shell("landing"))
        .route(LOGIN, shell("login"))
        .route(REGISTER, shell("register"))
}
