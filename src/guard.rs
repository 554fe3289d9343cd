use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    models::{OnboardingFlags, ProfileState, Role, SessionState},
    routes::{self, OnboardingStage, RouteClass, authenticated, public},
    store::AuthSnapshot,
};

/// Guard Evaluation Pipeline
///
/// The decision core of the navigation controller. For every navigation
/// request (target path + the current auth store snapshot) it computes
/// exactly one outcome: render the requested screen, redirect somewhere
/// else, or hold on a loading placeholder. First match wins, evaluated in a
/// fixed precedence order, and no branch can leave the UI indeterminate.
///
/// The pipeline is pure: it reads the snapshot, never mutates the store, and
/// identical inputs always produce identical decisions. Anything
/// time-dependent (token expiry) takes `now` as an explicit argument through
/// [`evaluate_at`].

/// Decision
///
/// The routing decision for one navigation. Serialized for the
/// `GET /nav/decision` endpoint so the SPA router can ask before it commits
/// to a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum Decision {
    /// Render the requested screen.
    Render,
    /// Navigate to `to` instead. `return_to` carries the originally
    /// requested path when the redirect is a login bounce, so the app can
    /// come back after authentication.
    #[serde(rename_all = "camelCase")]
    Redirect {
        to: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        return_to: Option<String>,
    },
    /// Session or profile is still resolving; show a loading placeholder.
    Loading,
}

impl Decision {
    fn redirect(to: impl Into<String>) -> Decision {
        Decision::Redirect {
            to: to.into(),
            return_to: None,
        }
    }

    /// A login bounce that preserves the originally requested path.
    fn login_bounce(from: &str) -> Decision {
        Decision::Redirect {
            to: public::LOGIN.to_string(),
            return_to: Some(from.to_string()),
        }
    }
}

/// evaluate
///
/// Entry point for live navigation: evaluates against the wall clock.
pub fn evaluate(path: &str, snapshot: &AuthSnapshot) -> Decision {
    evaluate_at(path, snapshot, Utc::now())
}

/// evaluate_at
///
/// The full pipeline, in precedence order:
///
/// 1. Session still loading, or authenticated with the profile not yet
///    loaded, yields `Loading`. A failed profile fetch stays here — the
///    guard fails closed rather than guessing at access.
/// 2. An authenticated session whose token has expired is treated as
///    anonymous, so the protected branches below bounce it to `/login`.
/// 3. Public-only paths render for anonymous users and bounce authenticated
///    ones to their role home.
/// 4. Onboarding steps pin the user to the first incomplete stage, in the
///    fixed order email -> details -> preferences -> devices; a fully
///    onboarded user is sent home instead. Admins bypass onboarding.
/// 5. Admin paths render for admins only; everyone else goes to
///    `/dashboard`.
/// 6. Gated paths require `hasDetails`, then apply the role-exclusivity
///    rules between the patient, provider, and guardian areas.
/// 7. Everything else is public and renders.
pub fn evaluate_at(path: &str, snapshot: &AuthSnapshot, now: DateTime<Utc>) -> Decision {
    // Resolve the session first. Expired tokens degrade to anonymous here,
    // in one place, so every later branch sees a consistent view.
    let authenticated = match snapshot.session {
        SessionState::Loading => return Decision::Loading,
        SessionState::Anonymous => false,
        SessionState::Authenticated(session) => session.is_active(now),
    };

    // An authenticated navigation cannot be decided without the profile:
    // role and flags drive every protected branch. Loading, absent, and
    // failed all hold the line (fail closed).
    let profile = if authenticated {
        match &snapshot.profile {
            ProfileState::Ready(profile) => Some(profile),
            ProfileState::Loading | ProfileState::Absent | ProfileState::Failed => {
                return Decision::Loading;
            }
        }
    } else {
        None
    };

    match routes::classify(path) {
        RouteClass::Public => Decision::Render,

        RouteClass::PublicOnly => match profile {
            Some(profile) => Decision::redirect(role_home_path(profile.role)),
            None => Decision::Render,
        },

        RouteClass::OnboardingStep(stage) => {
            let Some(profile) = profile else {
                return Decision::login_bounce(path);
            };
            if profile.role == Role::Admin {
                return Decision::Render;
            }
            match first_unmet_stage(&profile.flags) {
                Some(required) if required == stage => Decision::Render,
                Some(required) => Decision::redirect(required.step_path()),
                // Fully onboarded accounts never see an onboarding screen.
                None => Decision::redirect(role_home_path(profile.role)),
            }
        }

        RouteClass::Admin => {
            let Some(profile) = profile else {
                return Decision::login_bounce(path);
            };
            if profile.role == Role::Admin {
                Decision::Render
            } else {
                Decision::redirect(authenticated::DASHBOARD)
            }
        }

        RouteClass::Gated => {
            let Some(profile) = profile else {
                return Decision::login_bounce(path);
            };
            // Admins bypass onboarding and exclusivity entirely.
            if profile.role == Role::Admin {
                return Decision::Render;
            }
            // `hasDetails` is the onboarding watermark for gated screens;
            // anyone below it is pinned back to their next onboarding step.
            if !profile.flags.has_details {
                let step =
                    first_unmet_stage(&profile.flags).unwrap_or(OnboardingStage::Details);
                return Decision::redirect(step.step_path());
            }
            role_exclusivity(profile.role, path)
        }
    }
}

/// role_home_path
///
/// The home screen for each role. Pure and total: an unknown role falls back
/// to the landing page rather than crashing or looping.
pub fn role_home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => routes::admin::ADMIN_HOME,
        Role::Patient => authenticated::DASHBOARD,
        Role::Guardian => authenticated::GUARDIAN_PORTAL,
        Role::Provider => authenticated::PROVIDER_DASHBOARD,
        Role::Unknown => public::LANDING,
    }
}

/// first_unmet_stage
///
/// Walks the onboarding flags in their fixed order and returns the first
/// stage whose flag is still false. `None` means fully onboarded.
pub fn first_unmet_stage(flags: &OnboardingFlags) -> Option<OnboardingStage> {
    if !flags.email_verified {
        Some(OnboardingStage::EmailVerify)
    } else if !flags.has_details {
        Some(OnboardingStage::Details)
    } else if !flags.has_preferences {
        Some(OnboardingStage::Preferences)
    } else if !flags.has_devices {
        Some(OnboardingStage::Devices)
    } else {
        None
    }
}

/// role_exclusivity
///
/// The cross-role fences between the gated areas. A provider landing on the
/// patient dashboard is sent to the provider dashboard; a patient poking at
/// provider, guardian, or delegated-view paths goes back to `/dashboard`; a
/// guardian is kept inside the guardian portal. Paths with no fence (the
/// glucose log, the link-patient screen) render for any onboarded role.
fn role_exclusivity(role: Role, path: &str) -> Decision {
    use authenticated::{DASHBOARD, GUARDIAN_PORTAL, PATIENT_PORTAL, PROVIDER_DASHBOARD};

    match (role, path) {
        (Role::Provider, DASHBOARD) => Decision::redirect(PROVIDER_DASHBOARD),
        (Role::Patient, PROVIDER_DASHBOARD | GUARDIAN_PORTAL | PATIENT_PORTAL) => {
            Decision::redirect(DASHBOARD)
        }
        (Role::Guardian, DASHBOARD | PROVIDER_DASHBOARD | PATIENT_PORTAL) => {
            Decision::redirect(GUARDIAN_PORTAL)
        }
        _ => Decision::Render,
    }
}
