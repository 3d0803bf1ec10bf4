pub mod error;
pub mod service;

pub use error::TodoFeatureError;
pub use service::{CreateTodoInput, UpdateTodoInput, TodoService};
