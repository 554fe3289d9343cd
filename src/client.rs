use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::{
    error::PortalError,
    models::{
        LoginRequest, LoginResponse, PatientSummary, ProfileResponse, RegisterRequest,
        UpdateProfileRequest, VerifyRequest,
    },
    store::{AuthStore, ProfileGateway},
};

/// ApiClient
///
/// The typed HTTP client for the platform backend. The backend does the real
/// work (auth, persistence, glucose analytics, device integration); this
/// client only speaks its contracts and injects credentials.
///
/// Token injection: every request carries the bearer token from the current
/// store snapshot, and a session-scoped delegated token (guardian/provider
/// viewing a linked patient) overrides the primary one when present. That
/// precedence lives in `AuthSnapshot::bearer_token`, not here.
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<AuthStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<AuthStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    // --- Auth Contracts ---

    /// `POST /auth/login`. The returned token is not installed here; the
    /// caller decides when to hand it to `AuthStore::apply_login`.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, PortalError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), PortalError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    /// `POST /auth/verify` — submits the email verification code. The
    /// backend flips `emailVerified` server-side; the caller refreshes the
    /// profile afterwards to pick it up.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<(), PortalError> {
        let response = self
            .http
            .post(self.url("/auth/verify"))
            .json(request)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    // --- Profile Contracts ---

    /// `PUT /profile/me` — partial profile update. Returns the fresh wire
    /// profile so the caller can push it straight into the store.
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<ProfileResponse, PortalError> {
        let response = self
            .authorized(self.http.put(self.url("/profile/me")))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // --- Linked-Patient Contracts ---

    /// `GET /provider/patients` — the provider's patient roster.
    pub async fn provider_patients(&self) -> Result<Vec<PatientSummary>, PortalError> {
        let response = self
            .authorized(self.http.get(self.url("/provider/patients")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /guardian/linked-patients` — the guardian's linked patients.
    pub async fn guardian_linked_patients(&self) -> Result<Vec<PatientSummary>, PortalError> {
        let response = self
            .authorized(self.http.get(self.url("/guardian/linked-patients")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // --- Internals ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Attaches the bearer token from the current snapshot, if any.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let snapshot = self.store.snapshot();
        match snapshot.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Maps the backend's status codes onto the error taxonomy: 401 means
    /// the token died (forced logout upstream), everything else non-success
    /// is a plain backend failure.
    async fn check(response: Response) -> Result<Response, PortalError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(PortalError::AuthExpired),
            status => Err(PortalError::Backend { status }),
        }
    }
}

#[async_trait]
impl ProfileGateway for ApiClient {
    /// `GET /profile/me`. Transport failures surface as
    /// `ProfileFetchFailed` so the store can fail closed without conflating
    /// them with a rejected token.
    async fn fetch_profile(&self) -> Result<ProfileResponse, PortalError> {
        let response = self
            .authorized(self.http.get(self.url("/profile/me")))
            .send()
            .await
            .map_err(|err| PortalError::ProfileFetchFailed(err.to_string()))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| PortalError::ProfileFetchFailed(err.to_string()))
    }
}
