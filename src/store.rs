use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use tokio::sync::watch;

use crate::{
    error::PortalError,
    models::{Claims, ProfileResponse, ProfileState, Session, SessionState, UserProfile},
};

/// Auth Store Module
///
/// The single owner of session and profile state. What the source system
/// kept in ambient module-level context is an explicit, injected store here:
/// guards and handlers read immutable snapshots, subscribers watch for
/// changes, and only the login/logout/profile actions below mutate anything.
///
/// Concurrency model: one `watch` channel. Each mutation publishes a full
/// snapshot; readers never block writers. A stale in-flight profile fetch
/// that lands after the user has navigated on is simply applied
/// (last-write-wins) — a tolerated race, since the next fetch overwrites it.

/// ProfileGateway
///
/// The seam between the store and the backend profile contract. The real
/// implementation is the HTTP [`crate::client::ApiClient`]; tests inject a
/// mock so store transitions are exercised without a network.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// `GET /profile/me` — the account's role and onboarding flags.
    async fn fetch_profile(&self) -> Result<ProfileResponse, PortalError>;
}

/// The shared trait-object handle carried in application state.
pub type GatewayState = Arc<dyn ProfileGateway>;

/// AuthSnapshot
///
/// One immutable view of the store. Guards read `session` and `profile`;
/// the API client reads the token fields for header injection.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    pub session: SessionState,
    pub profile: ProfileState,
    /// Raw JWT backing the session, kept for outbound Authorization headers.
    pub token: Option<String>,
    /// Session-scoped token a guardian/provider holds while viewing a linked
    /// patient's data. Overrides the primary token when present.
    pub delegated_token: Option<String>,
}

impl AuthSnapshot {
    /// The token to attach to an outbound backend request, with the
    /// delegated token taking precedence over the primary one.
    pub fn bearer_token(&self) -> Option<&str> {
        self.delegated_token.as_deref().or(self.token.as_deref())
    }
}

/// AuthStore
///
/// Process-wide authentication store. Every hard load starts in
/// `SessionState::Loading` until [`AuthStore::bootstrap`] resolves whether a
/// usable stored token exists.
pub struct AuthStore {
    jwt_secret: String,
    tx: watch::Sender<AuthSnapshot>,
}

impl AuthStore {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot {
            session: SessionState::Loading,
            profile: ProfileState::Absent,
            token: None,
            delegated_token: None,
        });
        Self {
            jwt_secret: jwt_secret.into(),
            tx,
        }
    }

    // --- Read / Subscribe ---

    /// The current snapshot. Guards call this once per navigation so a
    /// single evaluation never sees a half-applied mutation.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    /// A receiver that yields whenever any store action publishes.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    // --- Session Actions ---

    /// bootstrap
    ///
    /// Resolves the initial `Loading` session on startup. A decodable,
    /// unexpired stored token opens an authenticated session with the
    /// profile marked loading; anything else (no token, expired, garbage)
    /// lands in a clean anonymous state.
    pub fn bootstrap(&self, stored_token: Option<&str>) {
        match stored_token {
            Some(jwt) => match self.decode_session(jwt) {
                Ok(session) => {
                    let token = jwt.to_string();
                    self.tx.send_modify(|snap| {
                        snap.session = SessionState::Authenticated(session);
                        snap.token = Some(token);
                        snap.profile = ProfileState::Loading;
                    });
                }
                Err(err) => {
                    tracing::warn!("stored token rejected at bootstrap: {err}");
                    self.reset_to_anonymous();
                }
            },
            None => self.reset_to_anonymous(),
        }
    }

    /// apply_login
    ///
    /// Installs the token returned by `POST /auth/login`. On success the
    /// session becomes authenticated and the profile slot flips to loading
    /// (the caller is expected to follow up with [`AuthStore::refresh_profile`]).
    /// A token that fails validation leaves the store anonymous.
    pub fn apply_login(&self, jwt: &str) -> Result<Session, PortalError> {
        match self.decode_session(jwt) {
            Ok(session) => {
                let token = jwt.to_string();
                self.tx.send_modify(|snap| {
                    snap.session = SessionState::Authenticated(session);
                    snap.token = Some(token);
                    snap.profile = ProfileState::Loading;
                    snap.delegated_token = None;
                });
                Ok(session)
            }
            Err(err) => {
                self.reset_to_anonymous();
                Err(err)
            }
        }
    }

    /// logout
    ///
    /// Destroys the session: anonymous, no profile, both tokens cleared.
    pub fn logout(&self) {
        self.reset_to_anonymous();
    }

    // --- Profile Actions ---

    /// set_profile
    ///
    /// Normalizes a wire profile at the store boundary and applies it
    /// unconditionally (last-write-wins).
    pub fn set_profile(&self, wire: ProfileResponse) {
        let profile = UserProfile::from_wire(wire);
        self.tx
            .send_modify(|snap| snap.profile = ProfileState::Ready(profile));
    }

    /// Marks the profile slot failed. Guards answer `Loading` for every
    /// protected path until a retry or logout resolves it — fail closed.
    pub fn mark_profile_failed(&self) {
        self.tx
            .send_modify(|snap| snap.profile = ProfileState::Failed);
    }

    /// refresh_profile
    ///
    /// The one profile fetch flow: mark loading, ask the gateway, apply the
    /// outcome. A 401 from the gateway means the token died server-side, so
    /// the whole session is torn down; any other failure fails closed.
    pub async fn refresh_profile(&self, gateway: &dyn ProfileGateway) {
        self.tx
            .send_modify(|snap| snap.profile = ProfileState::Loading);
        match gateway.fetch_profile().await {
            Ok(wire) => self.set_profile(wire),
            Err(PortalError::AuthExpired) => {
                tracing::warn!("profile fetch rejected, session expired; logging out");
                self.logout();
            }
            Err(err) => {
                tracing::error!("profile fetch failed: {err}");
                self.mark_profile_failed();
            }
        }
    }

    // --- Delegated Token (Guardian/Provider Patient View) ---

    /// Installs the delegated token issued when a guardian or provider opens
    /// a linked patient's dashboard. Outbound requests use it until cleared.
    pub fn set_delegated_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.tx
            .send_modify(|snap| snap.delegated_token = Some(token));
    }

    /// Drops the delegated token, returning outbound requests to the
    /// caller's own credentials.
    pub fn clear_delegated_token(&self) {
        self.tx.send_modify(|snap| snap.delegated_token = None);
    }

    // --- Internals ---

    fn reset_to_anonymous(&self) {
        self.tx.send_modify(|snap| {
            snap.session = SessionState::Anonymous;
            snap.profile = ProfileState::Absent;
            snap.token = None;
            snap.delegated_token = None;
        });
    }

    /// Decodes and validates the platform JWT. Expiry validation is always
    /// on; an expired signature maps to `AuthExpired` so callers can treat
    /// it as a forced logout rather than a malformed token.
    fn decode_session(&self, jwt: &str) -> Result<Session, PortalError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data =
            decode::<Claims>(jwt, &decoding_key, &validation).map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => PortalError::AuthExpired,
                _ => PortalError::Token(err),
            })?;

        let token_expiry = Utc
            .timestamp_opt(token_data.claims.exp as i64, 0)
            .single()
            .ok_or(PortalError::AuthExpired)?;

        Ok(Session { token_expiry })
    }
}
