use gluco_portal::routes::{self, OnboardingStage, RouteClass};

/// Every navigable path with its expected class. This is the authoritative
/// copy of the classification table; the production tables must agree with
/// it path by path.
fn expected() -> Vec<(&'static str, RouteClass)> {
    use RouteClass::*;
    vec![
        ("/", Public),
        ("/login", PublicOnly),
        ("/register", PublicOnly),
        ("/verify", OnboardingStep(OnboardingStage::EmailVerify)),
        ("/register-details", OnboardingStep(OnboardingStage::Details)),
        ("/onboarding", OnboardingStep(OnboardingStage::Preferences)),
        ("/medicine-info", OnboardingStep(OnboardingStage::Preferences)),
        ("/devices", OnboardingStep(OnboardingStage::Devices)),
        ("/dashboard", Gated),
        ("/glucose", Gated),
        ("/provider-dashboard", Gated),
        ("/guardian-portal", Gated),
        ("/patient-portal", Gated),
        ("/link-patient", Gated),
        ("/admin", Admin),
        ("/admin/users", Admin),
    ]
}

#[test]
fn every_known_path_classifies_as_expected() {
    for (path, class) in expected() {
        assert_eq!(routes::classify(path), class, "{path}");
    }
}

#[test]
fn classification_is_exclusive() {
    // Exactly one tag per path: the table has no duplicate paths, and
    // classify is a function, so re-evaluating cannot yield a second tag.
    let mut paths: Vec<&str> = expected().into_iter().map(|(p, _)| p).collect();
    let total = paths.len();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), total);
}

#[test]
fn unknown_paths_fall_back_to_public() {
    // The guard never blocks a path the router is going to 404.
    for path in ["/nope", "/dashboard/extra", "/LOGIN", ""] {
        assert_eq!(routes::classify(path), RouteClass::Public, "{path:?}");
    }
}

#[test]
fn admin_subtree_is_admin_classified() {
    assert_eq!(routes::classify("/admin/audit"), RouteClass::Admin);
}

#[test]
fn stage_step_paths_round_trip() {
    // Each stage's canonical step path classifies back to that stage.
    for stage in [
        OnboardingStage::EmailVerify,
        OnboardingStage::Details,
        OnboardingStage::Preferences,
        OnboardingStage::Devices,
    ] {
        assert_eq!(
            routes::classify(stage.step_path()),
            RouteClass::OnboardingStep(stage)
        );
    }
}
