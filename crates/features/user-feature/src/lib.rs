pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::UserFeatureError;
pub use service::{is_valid_email, Credentials, UserService};
pub use token::{Claims, TokenSigner};
