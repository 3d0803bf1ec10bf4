use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use user_feature::{Credentials, UserService};
use uuid::Uuid;

use crate::auth::{AuthSession, AUTH_HEADER};
use crate::error::ApiError;
use crate::AppState;

/// Public profile: the only user fields that ever leave the API
#[derive(Serialize)]
pub struct UserBody {
    pub id: Uuid,
    pub email: String,
}

impl From<domain::User> for UserBody {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<CredentialsBody> for Credentials {
    fn from(body: CredentialsBody) -> Self {
        Credentials {
            email: body.email,
            password: body.password,
        }
    }
}

fn auth_header(token: &str) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(token)
        .map_err(|_| ApiError::Validation("Token is not header-safe".to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTH_HEADER, value);
    Ok(headers)
}

/// POST /users
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(HeaderMap, Json<UserBody>), ApiError> {
    let (user, token) = UserService::signup(&state.pool, &state.signer, body.into()).await?;

    Ok((auth_header(&token)?, Json(user.into())))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(HeaderMap, Json<UserBody>), ApiError> {
    let (user, token) = UserService::login(&state.pool, &state.signer, body.into()).await?;

    Ok((auth_header(&token)?, Json(user.into())))
}

/// GET /users/me
pub async fn me(session: AuthSession) -> Json<UserBody> {
    Json(session.user.into())
}

/// DELETE /users/me/token
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    UserService::logout(&state.pool, session.user.id, &session.token).await?;

    Ok(Json(json!({})))
}
