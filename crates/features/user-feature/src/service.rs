use domain::{DomainError, User, UserRepository};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::UserFeatureError;
use crate::password;
use crate::token::TokenSigner;

/// Credentials presented at signup and login
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Service for user-related operations: signup, login, logout, and the
/// token-to-user capability lookup that protects every other route.
pub struct UserService;

impl UserService {
    /// Register a new user and issue their first auth token
    ///
    /// The user row and the token are committed together; a failed signup
    /// leaves nothing behind.
    pub async fn signup(
        pool: &PgPool,
        signer: &TokenSigner,
        credentials: Credentials,
    ) -> Result<(User, String), UserFeatureError> {
        let email = credentials.email.trim().to_string();

        if !is_valid_email(&email) {
            return Err(UserFeatureError::InvalidEmail(email));
        }
        if !password::meets_policy(&credentials.password) {
            return Err(UserFeatureError::WeakPassword);
        }
        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(UserFeatureError::EmailExists(email));
        }

        let hash = password::hash_password(&credentials.password)?;

        let mut tx = pool.begin().await.map_err(DomainError::from)?;
        // The pre-check above races with concurrent signups; the unique
        // constraint is the authority.
        let user = match UserRepository::create(&mut *tx, &email, &hash).await {
            Ok(user) => user,
            Err(err) if err.is_unique_violation() => {
                return Err(UserFeatureError::EmailExists(email));
            }
            Err(err) => return Err(err.into()),
        };
        let token = signer.mint(user.id)?;
        UserRepository::add_token(&mut *tx, user.id, &token).await?;
        tx.commit().await.map_err(DomainError::from)?;

        info!(user_id = %user.id, "user registered");
        Ok((user, token))
    }

    /// Log a user in, appending a new token to their sequence
    ///
    /// Unknown email and wrong password both collapse to
    /// [`UserFeatureError::InvalidCredentials`].
    pub async fn login(
        pool: &PgPool,
        signer: &TokenSigner,
        credentials: Credentials,
    ) -> Result<(User, String), UserFeatureError> {
        let user = UserRepository::find_by_email(pool, credentials.email.trim())
            .await?
            .ok_or(UserFeatureError::InvalidCredentials)?;

        if !password::verify_password(&credentials.password, &user.password_hash) {
            return Err(UserFeatureError::InvalidCredentials);
        }

        let token = signer.mint(user.id)?;
        UserRepository::add_token(pool, user.id, &token).await?;

        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Resolve the user holding a presented token
    ///
    /// A token must both carry a valid signature and still exist in the
    /// user's token sequence; logout revokes it immediately regardless of
    /// its expiry. Every failure collapses to
    /// [`UserFeatureError::Unauthorized`].
    pub async fn authenticate(
        pool: &PgPool,
        signer: &TokenSigner,
        token: &str,
    ) -> Result<User, UserFeatureError> {
        let claims = signer
            .verify(token)
            .map_err(|_| UserFeatureError::Unauthorized)?;

        let user = UserRepository::find_by_token(pool, token)
            .await?
            .ok_or(UserFeatureError::Unauthorized)?;

        if user.id != claims.sub {
            return Err(UserFeatureError::Unauthorized);
        }

        Ok(user)
    }

    /// Remove exactly the presented token from the user's sequence
    pub async fn logout(
        pool: &PgPool,
        user_id: Uuid,
        token: &str,
    ) -> Result<(), UserFeatureError> {
        UserRepository::remove_token(pool, user_id, token).await?;
        info!(user_id = %user_id, "token revoked");
        Ok(())
    }
}

/// Well-formedness predicate for email addresses
///
/// Deliberately loose: one `@` with a non-empty local part and a dotted
/// domain. Deliverability is not this layer's problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
