use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use domain::User;
use user_feature::UserService;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the auth token in both directions
pub const AUTH_HEADER: &str = "x-auth";

/// The authenticated caller, resolved from the `x-auth` header
///
/// Extracting this is the capability lookup: token → user, checked against
/// the user's stored token sequence. Any failure is a uniform 401 before the
/// route body runs. The presented token is kept so logout can revoke exactly
/// that session.
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?
            .to_string();

        let user = UserService::authenticate(&state.pool, &state.signer, &token)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthSession { user, token })
    }
}
