// Core authorization and query-construction logic
pub mod auth;
pub mod query;

pub use auth::{parse_bearer, sanitize_update, SanitizeError};
pub use query::{escape_like, parse_framework_list, ModelFilter};
