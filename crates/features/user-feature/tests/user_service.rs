//! BDD-style behavior tests for the User feature
//!
//! These tests verify signup, login, logout and token authentication
//! behaviors. Focus on workflows and business rules, not implementation
//! details.

use domain::UserRepository;
use sqlx::PgPool;
use user_feature::{Credentials, TokenSigner, UserFeatureError, UserService};

fn signer() -> TokenSigner {
    TokenSigner::new("test-secret", 30)
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

// =============================================================================
// Signup Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_creates_user_and_issues_token(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, token) =
        UserService::signup(&pool, &signer(), credentials("a@b.com", "secret1")).await?;

    assert_eq!(user.email, "a@b.com");
    assert!(!token.is_empty());

    // The issued token is in the user's sequence
    let tokens = UserRepository::list_tokens(&pool, user.id).await?;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token, token);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_never_stores_the_plaintext_password(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, _) =
        UserService::signup(&pool, &signer(), credentials("hashed@b.com", "secret1")).await?;

    let stored = UserRepository::find_by_id(&pool, user.id).await?.unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert!(user_feature::password::verify_password("secret1", &stored.password_hash));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_trims_the_email(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, _) =
        UserService::signup(&pool, &signer(), credentials("  padded@b.com  ", "secret1")).await?;

    assert_eq!(user.email, "padded@b.com");
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_rejects_malformed_email(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::signup(&pool, &signer(), credentials("lkj", "secret1")).await;

    assert!(matches!(result, Err(UserFeatureError::InvalidEmail(_))));
    // Nothing was persisted
    assert!(UserRepository::find_by_email(&pool, "lkj").await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_rejects_weak_password(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::signup(&pool, &signer(), credentials("weak@b.com", "123")).await;

    assert!(matches!(result, Err(UserFeatureError::WeakPassword)));
    assert!(UserRepository::find_by_email(&pool, "weak@b.com").await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn signup_rejects_taken_email(pool: PgPool) -> Result<(), UserFeatureError> {
    UserService::signup(&pool, &signer(), credentials("taken@b.com", "secret1")).await?;

    let result = UserService::signup(&pool, &signer(), credentials("taken@b.com", "other-pass")).await;

    assert!(matches!(result, Err(UserFeatureError::EmailExists(_))));
    Ok(())
}

// =============================================================================
// Login Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn login_appends_exactly_one_token(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, signup_token) =
        UserService::signup(&pool, &signer(), credentials("login@b.com", "secret1")).await?;

    let (logged_in, login_token) =
        UserService::login(&pool, &signer(), credentials("login@b.com", "secret1")).await?;

    assert_eq!(logged_in.id, user.id);
    assert_ne!(login_token, signup_token);

    let tokens = UserRepository::list_tokens(&pool, user.id).await?;
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].token, login_token);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn login_with_wrong_password_issues_nothing(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, _) =
        UserService::signup(&pool, &signer(), credentials("victim@b.com", "secret1")).await?;

    let result = UserService::login(&pool, &signer(), credentials("victim@b.com", "wrong")).await;

    assert!(matches!(result, Err(UserFeatureError::InvalidCredentials)));
    assert_eq!(UserRepository::list_tokens(&pool, user.id).await?.len(), 1);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) -> Result<(), UserFeatureError> {
    UserService::signup(&pool, &signer(), credentials("exists@b.com", "secret1")).await?;

    let unknown_email =
        UserService::login(&pool, &signer(), credentials("ghost@b.com", "secret1")).await;
    let wrong_password =
        UserService::login(&pool, &signer(), credentials("exists@b.com", "nope42")).await;

    // Same variant, same message: the caller learns nothing about which half failed
    let unknown_email = unknown_email.unwrap_err();
    let wrong_password = wrong_password.unwrap_err();
    assert!(matches!(unknown_email, UserFeatureError::InvalidCredentials));
    assert!(matches!(wrong_password, UserFeatureError::InvalidCredentials));
    assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    Ok(())
}

// =============================================================================
// Authentication Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn authenticate_resolves_the_token_holder(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, token) =
        UserService::signup(&pool, &signer(), credentials("auth@b.com", "secret1")).await?;

    let resolved = UserService::authenticate(&pool, &signer(), &token).await?;

    assert_eq!(resolved.id, user.id);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn authenticate_rejects_garbage_tokens(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::authenticate(&pool, &signer(), "not.a.token").await;

    assert!(matches!(result, Err(UserFeatureError::Unauthorized)));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn authenticate_rejects_well_signed_but_unissued_tokens(
    pool: PgPool,
) -> Result<(), UserFeatureError> {
    let (user, _) =
        UserService::signup(&pool, &signer(), credentials("forged@b.com", "secret1")).await?;

    // Signed with the right secret but never appended to the sequence
    let unissued = signer().mint(user.id)?;
    let result = UserService::authenticate(&pool, &signer(), &unissued).await;

    assert!(matches!(result, Err(UserFeatureError::Unauthorized)));
    Ok(())
}

// =============================================================================
// Logout Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn logout_revokes_only_the_presented_token(pool: PgPool) -> Result<(), UserFeatureError> {
    let (user, first) =
        UserService::signup(&pool, &signer(), credentials("multi@b.com", "secret1")).await?;
    let (_, second) =
        UserService::login(&pool, &signer(), credentials("multi@b.com", "secret1")).await?;

    UserService::logout(&pool, user.id, &first).await?;

    // A user with 2 tokens who logs out one session retains exactly 1
    let tokens = UserRepository::list_tokens(&pool, user.id).await?;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token, second);

    // The revoked token no longer authenticates; the survivor still does
    assert!(UserService::authenticate(&pool, &signer(), &first).await.is_err());
    assert!(UserService::authenticate(&pool, &signer(), &second).await.is_ok());
    Ok(())
}
