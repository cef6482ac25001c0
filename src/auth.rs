use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::{Role, User},
    repository::RepositoryState,
};

/// Name of the cookie carrying the session token between requests.
pub const SESSION_COOKIE: &str = "session";

/// Session lifetime. There is no refresh flow; an expired token simply stops
/// resolving and the user logs in again.
const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Claims
///
/// The payload structure inside a session token. Claims are signed with the
/// server's secret and validated on every request that presents a session.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's row id in the `users` table.
    pub sub: i64,
    /// Expiration Time (exp): timestamp after which the token must not be accepted.
    pub exp: usize,
    /// Issued At (iat): timestamp when the token was issued.
    pub iat: usize,
}

/// Identity
///
/// The resolved authenticated subject of a request: the output of a valid
/// session token whose user still exists in the store. Guards consume this
/// to make Allow/Reject decisions; handlers consume it for authorship.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i64,
    pub role: Role,
}

/// issue_session
///
/// Signs a fresh session token for the given user. Called on successful
/// login and on registration (registering implies logging in).
pub fn issue_session(user: &User, config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        exp: (now + SESSION_TTL_SECS) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("session token signing failed: {:?}", e);
        ApiError::Internal
    })
}

/// session_cookie
///
/// Builds the Set-Cookie value that persists the session client-side.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// clear_session_cookie
///
/// Builds the Set-Cookie value that removes the session. Logout sends this
/// unconditionally, whether or not a session existed.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pulls the session token out of a request: `Authorization: Bearer` first
/// (API clients), then the `session` cookie (browser clients).
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(auth_header) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then(|| value.to_string())
            })
        })
}

/// MaybeIdentity Extractor
///
/// Resolves the request's identity if a valid session is present, without
/// ever rejecting the request itself. The Allow/Reject decision belongs to
/// the explicit guard functions below, because the failure mode differs per
/// route (redirect for anonymous vs 403 for the wrong user); an extractor
/// that rejected on its own could only pick one.
///
/// Resolution involves:
/// 1. Token extraction (Bearer header or session cookie).
/// 2. Signature and expiry validation against the configured secret.
/// 3. DB lookup, confirming the user still exists and loading the current
///    role. This prevents access if the user was deleted after the token
///    was issued.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let Some(token) = extract_token(parts) else {
            return Ok(MaybeIdentity(None));
        };

        let decoding_key = DecodingKey::from_secret(config.session_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = match decode::<Claims>(&token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                // Expired or tampered tokens degrade to "no session" rather
                // than a hard failure; the guards decide what that means.
                tracing::debug!("session token rejected: {:?}", e.kind());
                return Ok(MaybeIdentity(None));
            }
        };

        let identity = repo.get_user(token_data.claims.sub).await.map(|user| Identity {
            id: user.id,
            role: user.role,
        });

        Ok(MaybeIdentity(identity))
    }
}

// --- Guards ---
//
// Explicit guard functions composed inside handlers: each takes the resolved
// identity and returns Allow (the identity) or Reject (an ApiError that maps
// to the correct HTTP outcome). Services never call these; they trust their
// caller to have gated the request.

/// require_login
///
/// Gate for actions any authenticated user may perform (viewing a post,
/// commenting, deleting a comment). Anonymous requests are redirected to the
/// login view via `ApiError::Unauthenticated`.
pub fn require_login(identity: &MaybeIdentity) -> Result<&Identity, ApiError> {
    identity.0.as_ref().ok_or(ApiError::Unauthenticated)
}

/// require_admin
///
/// Gate for the admin-only post operations. The asymmetry is deliberate:
/// no session at all redirects to login, while a real but non-admin user
/// gets a 403.
pub fn require_admin(identity: &MaybeIdentity) -> Result<&Identity, ApiError> {
    let identity = require_login(identity)?;
    if identity.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_redirected_by_both_guards() {
        let anon = MaybeIdentity(None);
        assert!(matches!(require_login(&anon), Err(ApiError::Unauthenticated)));
        assert!(matches!(require_admin(&anon), Err(ApiError::Unauthenticated)));
    }

    #[test]
    fn member_passes_login_but_not_admin() {
        let member = MaybeIdentity(Some(Identity {
            id: 2,
            role: Role::Member,
        }));
        assert!(require_login(&member).is_ok());
        assert!(matches!(require_admin(&member), Err(ApiError::Forbidden)));
    }

    #[test]
    fn admin_passes_both_guards() {
        let admin = MaybeIdentity(Some(Identity {
            id: 1,
            role: Role::Admin,
        }));
        assert!(require_login(&admin).is_ok());
        assert!(require_admin(&admin).is_ok());
    }
}
