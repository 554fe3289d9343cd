use gluco_portal::{
    guard::Decision,
    models::{OnboardingFlags, ProfileResponse, Role, UserProfile},
};
use uuid::Uuid;

// --- Role Normalization ---

#[test]
fn role_parse_is_case_insensitive() {
    assert_eq!(Role::parse("admin"), Role::Admin);
    assert_eq!(Role::parse("ADMIN"), Role::Admin);
    assert_eq!(Role::parse("Patient"), Role::Patient);
    assert_eq!(Role::parse("gUaRdIaN"), Role::Guardian);
    assert_eq!(Role::parse("provider"), Role::Provider);
}

#[test]
fn role_parse_tolerates_prefix_and_whitespace() {
    assert_eq!(Role::parse("ROLE_PATIENT"), Role::Patient);
    assert_eq!(Role::parse("role_admin"), Role::Admin);
    assert_eq!(Role::parse("  guardian  "), Role::Guardian);
}

#[test]
fn role_parse_never_fails() {
    for raw in ["", "superuser", "ROLE_", "admin2", "None", "äöü"] {
        assert_eq!(Role::parse(raw), Role::Unknown, "{raw:?}");
    }
}

// --- Flags Defaulting ---

#[test]
fn missing_flags_object_defaults_to_all_false() {
    let json = format!(
        r#"{{"id":"{}","email":"p@example.com","role":"PATIENT"}}"#,
        Uuid::from_u128(1)
    );
    let wire: ProfileResponse = serde_json::from_str(&json).unwrap();
    let profile = UserProfile::from_wire(wire);
    assert_eq!(profile.flags, OnboardingFlags::default());
    assert!(!profile.flags.email_verified);
}

#[test]
fn partial_flags_object_defaults_the_rest() {
    let json = format!(
        r#"{{"id":"{}","email":"p@example.com","role":"patient","flags":{{"emailVerified":true}}}}"#,
        Uuid::from_u128(1)
    );
    let wire: ProfileResponse = serde_json::from_str(&json).unwrap();
    let profile = UserProfile::from_wire(wire);
    assert_eq!(profile.role, Role::Patient);
    assert!(profile.flags.email_verified);
    assert!(!profile.flags.has_details);
}

#[test]
fn flags_wire_names_are_camel_case() {
    let json = r#"{
        "emailVerified": true,
        "hasDetails": true,
        "hasPreferences": false,
        "hasDevices": false,
        "hasLinkedPatient": true
    }"#;
    let flags: OnboardingFlags = serde_json::from_str(json).unwrap();
    assert!(flags.email_verified);
    assert!(flags.has_details);
    assert!(flags.has_linked_patient);
    assert!(!flags.has_devices);
}

// --- Decision Wire Shape ---

#[test]
fn decision_serializes_with_a_tag() {
    let rendered = serde_json::to_value(Decision::Render).unwrap();
    assert_eq!(rendered, serde_json::json!({"decision": "render"}));

    let redirect = serde_json::to_value(Decision::Redirect {
        to: "/login".to_string(),
        return_to: Some("/dashboard".to_string()),
    })
    .unwrap();
    assert_eq!(
        redirect,
        serde_json::json!({"decision": "redirect", "to": "/login", "returnTo": "/dashboard"})
    );

    let plain = serde_json::to_value(Decision::Redirect {
        to: "/dashboard".to_string(),
        return_to: None,
    })
    .unwrap();
    // The absent return path is omitted, not null.
    assert_eq!(
        plain,
        serde_json::json!({"decision": "redirect", "to": "/dashboard"})
    );
}
