use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserFeatureError {
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Email is not well-formed: {0}")]
    InvalidEmail(String),

    #[error("Password does not meet the minimum strength policy")]
    WeakPassword,

    #[error("Email already exists: {0}")]
    EmailExists(String),

    // One message for unknown email and wrong password; the caller must not
    // be able to tell them apart.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid authentication token")]
    Unauthorized,

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Token error: {0}")]
    Token(String),
}
