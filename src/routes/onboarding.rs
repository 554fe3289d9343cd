use axum::Router;

use crate::AppState;

use super::{OnboardingStage, shell};

/// Onboarding Router Module
///
/// Owns the onboarding step paths. The sequence is fixed: email verification
/// first, then personal details, then preferences, then device setup. The
/// guard pipeline walks the account's flags in that order and pins the user
/// to the first incomplete stage until the backend flips its flag.

/// Email verification screen (gate: `emailVerified`).
pub const VERIFY: &str = "/verify";
/// Personal/medical details form (gate: `hasDetails`).
pub const REGISTER_DETAILS: &str = "/register-details";
/// Preferences screen (gate: `hasPreferences`).
pub const PREFERENCES: &str = "/onboarding";
/// Medication info screen. Part of the preferences stage, not a gate of its
/// own: it renders whenever the preferences screen would.
pub const MEDICINE_INFO: &str = "/medicine-info";
/// Device setup screen (gate: `hasDevices`).
pub const DEVICES: &str = "/devices";

/// stage_for
///
/// Maps an onboarding path to its stage. `None` means the path is not part
/// of the onboarding sequence at all.
pub fn stage_for(path: &str) -> Option<OnboardingStage> {
    match path {
        VERIFY => Some(OnboardingStage::EmailVerify),
        REGISTER_DETAILS => Some(OnboardingStage::Details),
        PREFERENCES | MEDICINE_INFO => Some(OnboardingStage::Preferences),
        DEVICES => Some(OnboardingStage::Devices),
        _ => None,
    }
}

/// onboarding_routes
///
/// View shells for the onboarding sequence. Access order is enforced by the
/// guard layer above this router, never by the handlers.
pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route(VERIFY, shell("verify-email"))
        .route(REGISTER_DETAILS, shell("register-details"))
        .route(PREFERENCES, shell("preferences"))
        .route(MEDICINE_INFO, shell("medicine-info"))
        .route(DEVICES, shell("device-setup"))
}
