use axum::{
    Json,
    routing::{MethodRouter, get},
};

use crate::models::ViewShell;

/// Router Module Index
///
/// Organizes the navigable paths of the platform into guard-segregated
/// modules. Each module owns the path table for one route class and the
/// view-shell sub-router that serves those paths once the guard pipeline has
/// allowed them through.
///
/// Classification invariant: every navigable path carries exactly one
/// `RouteClass` tag, and the tag alone determines which branch of the guard
/// pipeline evaluates it.

/// Paths reachable without authentication, plus the public-only gateway
/// paths (`/login`, `/register`) that authenticated users are bounced from.
pub mod public;

/// The onboarding step paths and their fixed stage ordering.
pub mod onboarding;

/// Paths requiring a fully onboarded, authenticated account, including the
/// role-exclusive dashboards.
pub mod authenticated;

/// Paths restricted exclusively to the `admin` role.
pub mod admin;

/// RouteClass
///
/// The single tag attached to every navigable path. Tags partition the path
/// space; `classify` is total over arbitrary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Anonymous-accessible content (landing page, unknown paths).
    Public,
    /// Login/register: rendered only while unauthenticated.
    PublicOnly,
    /// One screen of the onboarding sequence, tagged with its stage.
    OnboardingStep(OnboardingStage),
    /// Requires an authenticated, onboarded account.
    Gated,
    /// Requires the admin role.
    Admin,
}

/// OnboardingStage
///
/// The four onboarding stages in their fixed completion order. The guard
/// walks these in declaration order; the first stage whose flag is unmet is
/// where the user must go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OnboardingStage {
    EmailVerify,
    Details,
    Preferences,
    Devices,
}

impl OnboardingStage {
    /// The canonical step path a user is redirected to for this stage.
    pub fn step_path(self) -> &'static str {
        match self {
            OnboardingStage::EmailVerify => onboarding::VERIFY,
            OnboardingStage::Details => onboarding::REGISTER_DETAILS,
            OnboardingStage::Preferences => onboarding::PREFERENCES,
            OnboardingStage::Devices => onboarding::DEVICES,
        }
    }
}

/// classify
///
/// Maps any path string to its single route class. Unknown paths classify as
/// `Public` so the guard never blocks a path the router is going to 404
/// anyway; real protected screens are all enumerated in the module tables.
pub fn classify(path: &str) -> RouteClass {
    if let Some(stage) = onboarding::stage_for(path) {
        return RouteClass::OnboardingStep(stage);
    }
    if public::is_public_only(path) {
        return RouteClass::PublicOnly;
    }
    if admin::is_admin_path(path) {
        return RouteClass::Admin;
    }
    if authenticated::is_gated(path) {
        return RouteClass::Gated;
    }
    RouteClass::Public
}

/// shell
///
/// Builds the minimal GET handler for one screen. Presentational rendering
/// is the frontend's job; the controller only marks which view occupies the
/// render slot once its guard has said `Render`.
pub(crate) fn shell<S>(view: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(move || async move {
        Json(ViewShell {
            view: view.to_string(),
        })
    })
}
