use axum::http::StatusCode;
use thiserror::Error;

/// PortalError
///
/// The error taxonomy for everything that crosses the backend boundary.
///
/// Note what is *not* here: an unrecognized role and a missing flags object
/// are handled by degradation at the model boundary (`Role::Unknown`,
/// all-false flags), and no guard branch ever returns an error. Every
/// navigation resolves to render, redirect, or loading; these variants exist
/// for the store actions and the API client, where a caller can actually do
/// something about the failure.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The session token is expired, malformed, or was rejected by the
    /// backend (HTTP 401). The store reacts by forcing a logout, which the
    /// guards then turn into a redirect to `/login`.
    #[error("session token expired or rejected")]
    AuthExpired,

    /// The profile fetch did not complete. Guards fail closed on this: the
    /// profile slot stays in a loading/error state and no access is granted
    /// or denied until the app retries or logs out.
    #[error("profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// The backend answered with a non-success status other than 401.
    #[error("backend returned status {status}")]
    Backend { status: StatusCode },

    /// Transport-level failure talking to the backend.
    #[error("backend request failed")]
    Http(#[from] reqwest::Error),

    /// The JWT could not be decoded or failed validation.
    #[error("token decode failed")]
    Token(#[from] jsonwebtoken::errors::Error),
}
