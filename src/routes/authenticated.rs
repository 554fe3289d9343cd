use axum::Router;

use crate::AppState;

use super::shell;

/// Authenticated Router Module
///
/// Owns the paths that require an authenticated, fully onboarded account.
/// Several of these are role-exclusive: the patient dashboard, the provider
/// dashboard, and the guardian portal each belong to one role, and the guard
/// pipeline redirects the other roles to their own home instead of rendering
/// a screen they have no business on.

/// Patient home: glucose overview and recent readings.
pub const DASHBOARD: &str = "/dashboard";
/// Glucose measurement log (entry and history).
pub const GLUCOSE: &str = "/glucose";
/// Provider home: the provider's linked-patient roster.
pub const PROVIDER_DASHBOARD: &str = "/provider-dashboard";
/// Guardian home: the guardian's linked-patient overview.
pub const GUARDIAN_PORTAL: &str = "/guardian-portal";
/// Read-only view of a linked patient's dashboard, used by providers under
/// a delegated token.
pub const PATIENT_PORTAL: &str = "/patient-portal";
/// Guardian screen for linking a patient account.
pub const LINK_PATIENT: &str = "/link-patient";

/// Whether `path` is one of the authenticated-gated paths.
pub fn is_gated(path: &str) -> bool {
    matches!(
        path,
        DASHBOARD | GLUCOSE | PROVIDER_DASHBOARD | GUARDIAN_PORTAL | PATIENT_PORTAL | LINK_PATIENT
    )
}

/// gated_routes
///
/// View shells for the authenticated screens. Role exclusivity and the
/// onboarding gate are enforced by the guard layer above this router.
pub fn gated_routes() -> Router<AppState> {
    Router::new()
        .route(DASHBOARD, shell("dashboard"))
        .route(GLUCOSE, shell("glucose-log"))
        .route(PROVIDER_DASHBOARD, shell("provider-dashboard"))
        .route(GUARDIAN_PORTAL, shell("guardian-portal"))
        .route(PATIENT_PORTAL, shell("patient-portal"))
        .route(LINK_PATIENT, shell("link-patient"))
}
