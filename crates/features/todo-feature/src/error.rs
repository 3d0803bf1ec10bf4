use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoFeatureError {
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    // Covers both "no such todo" and "not the caller's todo"; the two must
    // stay indistinguishable to avoid leaking existence.
    #[error("Todo not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Todo text must not be empty")]
    EmptyText,
}
