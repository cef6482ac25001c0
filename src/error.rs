use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The application-wide error taxonomy. Every failure a request can produce is
/// one of these variants; none of them is fatal to the process. Each variant
/// maps to exactly one HTTP outcome in `IntoResponse`, so handlers and
/// services can return `Result<T, ApiError>` and never reason about status
/// codes themselves.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed, missing, or duplicate input. Recovered locally: the message
    /// is shown to the user alongside the form they submitted.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity (post, comment) does not exist.
    #[error("not found")]
    NotFound,

    /// The request carries a valid identity, but that identity lacks the
    /// admin role required by the route.
    #[error("forbidden")]
    Forbidden,

    /// No session at all. Surfaced as a redirect to the login view, never as
    /// a bare 401 — the asymmetry with `Forbidden` is deliberate and must be
    /// preserved (wrong user gets 403, no user gets sent to log in).
    #[error("login required")]
    Unauthenticated,

    /// Duplicate registration. The user is told to log in instead.
    #[error("{0}")]
    Conflict(String),

    /// Login with an email that has no account. Distinct from a wrong
    /// password by design: the two produce different user-facing messages.
    #[error("you aren't registered to this site, register instead!")]
    UnknownEmail,

    /// Login with a known email but a password that does not verify.
    #[error("invalid password!")]
    InvalidPassword,

    /// Infrastructure failure (database, hashing, token signing). The only
    /// variant that represents a bug or outage rather than a user mistake.
    #[error("internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            // The no-session case is a redirect, not a status-only reply.
            ApiError::Unauthenticated => return Redirect::to("/login").into_response(),
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnknownEmail | ApiError::InvalidPassword => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
