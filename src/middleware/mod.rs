pub mod auth;

pub use auth::{auth_middleware, optional_user, CurrentUser};
