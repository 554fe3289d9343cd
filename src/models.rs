use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// --- Core Domain Types (Session & Profile) ---

/// Role
///
/// The role attached to every account on the platform. This is the RBAC field
/// that the guard pipeline branches on: admins manage users, patients log
/// glucose readings, guardians and providers view linked patients' data.
///
/// The backend delivers roles as strings with inconsistent casing (and
/// occasionally a `ROLE_` prefix); they are normalized exactly once, at the
/// store boundary, through [`Role::parse`]. An unrecognized string maps to
/// `Unknown` rather than an error so routing can always fall back to a
/// default path instead of crashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Patient,
    Guardian,
    Provider,
    #[default]
    Unknown,
}

impl Role {
    /// parse
    ///
    /// Total, pure normalization of a backend role string. Tolerates any
    /// casing, surrounding whitespace, and a `ROLE_` prefix. Never fails:
    /// every input maps to some variant, with `Unknown` as the catch-all.
    pub fn parse(raw: &str) -> Role {
        let normalized = raw.trim().to_ascii_uppercase();
        let normalized = normalized.strip_prefix("ROLE_").unwrap_or(&normalized);
        match normalized {
            "ADMIN" => Role::Admin,
            "PATIENT" => Role::Patient,
            "GUARDIAN" => Role::Guardian,
            "PROVIDER" => Role::Provider,
            _ => Role::Unknown,
        }
    }
}

/// OnboardingFlags
///
/// Per-account onboarding completion markers. The backend flips these
/// server-side as each onboarding step completes; for a given account
/// lifecycle they only ever transition false -> true (admin action is the
/// one exception, and it arrives as a full profile replacement).
///
/// Every field defaults to `false`, so a profile payload with a missing or
/// partial `flags` object deserializes as "nothing completed yet" and routes
/// the user to the first onboarding step instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingFlags {
    pub email_verified: bool,
    pub has_details: bool,
    pub has_preferences: bool,
    pub has_devices: bool,
    pub has_linked_patient: bool,
}

impl OnboardingFlags {
    /// Convenience constructor for a fully onboarded account.
    pub fn complete() -> Self {
        Self {
            email_verified: true,
            has_details: true,
            has_preferences: true,
            has_devices: true,
            has_linked_patient: false,
        }
    }
}

/// UserProfile
///
/// The normalized, in-process representation of the account record the guard
/// pipeline reads. Produced from a [`ProfileResponse`] via
/// [`UserProfile::from_wire`]; guards never see raw wire data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub flags: OnboardingFlags,
}

impl UserProfile {
    /// from_wire
    ///
    /// The single store-boundary conversion from the backend's profile shape.
    /// Role strings are normalized here (never inline per-guard) and an
    /// absent flags object becomes all-false.
    pub fn from_wire(wire: ProfileResponse) -> Self {
        Self {
            id: wire.id,
            email: wire.email,
            role: Role::parse(&wire.role),
            flags: wire.flags.unwrap_or_default(),
        }
    }
}

/// Session
///
/// The authenticated session, created on login and destroyed on logout or
/// token expiry. Only the expiry matters to the guards; the raw token string
/// lives in the store snapshot for outbound header injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    #[ts(type = "string")]
    pub token_expiry: DateTime<Utc>,
}

impl Session {
    /// Whether the session token is still valid at `now`. An expired session
    /// is treated as anonymous by the guards (AuthExpired semantics).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.token_expiry > now
    }
}

/// SessionState
///
/// Lifecycle of the session slot in the auth store. `Loading` is the unique
/// initial state on every hard page load, resolved by the store bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(Session),
}

/// ProfileState
///
/// Lifecycle of the profile slot in the auth store.
///
/// `Failed` is deliberately distinct from `Absent`: a failed profile fetch
/// must fail closed, so guards keep answering `Loading` until the app
/// retries or logs out.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    Loading,
    Absent,
    Ready(UserProfile),
    Failed,
}

/// Claims
///
/// The payload structure expected inside the platform JWT, validated against
/// the shared secret on login and on store bootstrap.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the account UUID.
    pub sub: Uuid,
    /// Expiration time (exp): timestamp after which the token is rejected.
    pub exp: usize,
    /// Issued at (iat).
    pub iat: usize,
}

// --- Backend Wire Payloads (Consumed Contracts) ---

/// ProfileResponse
///
/// The raw profile shape returned by `GET /profile/me`. Role arrives as a
/// free-form string and `flags` may be missing entirely; both are normalized
/// by [`UserProfile::from_wire`] before anything else touches them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub flags: Option<OnboardingFlags>,
}

/// LoginRequest
///
/// Input payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// Output of `POST /auth/login`. The token is handed straight to
/// `AuthStore::apply_login`; it is never persisted or logged by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub jwt: String,
}

/// RegisterRequest
///
/// Input payload for `POST /auth/register`. The password passes through to
/// the backend auth service and is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// VerifyRequest
///
/// Input payload for `POST /auth/verify` (email verification code).
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct VerifyRequest {
    pub code: String,
}

/// UpdateProfileRequest
///
/// Partial update payload for `PUT /profile/me`. Uses `Option<T>` plus
/// `skip_serializing_if` so only the provided fields travel over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose_unit: Option<String>,
}

/// PatientSummary
///
/// One linked patient as returned by `GET /provider/patients` and
/// `GET /guardian/linked-patients`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct PatientSummary {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    #[ts(type = "string | null")]
    pub last_reading_at: Option<DateTime<Utc>>,
}

// --- Exposed Navigation Shapes ---

/// ViewShell
///
/// Minimal descriptor of a screen the guard has allowed through. The actual
/// presentational component lives in the frontend; this marks the render
/// slot and nothing more.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct ViewShell {
    pub view: String,
}

/// DecisionQuery
///
/// Query parameters accepted by `GET /nav/decision`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct DecisionQuery {
    /// The navigation target the SPA router is about to resolve.
    pub path: String,
}
