//! Model Inventory - backend API server for the AI model inventory marketplace
//!
//! This library exposes the authorization gate, query construction, store
//! client, and route handlers behind the HTTP surface, so the pieces can be
//! exercised directly in tests.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{parse_bearer, sanitize_update, ModelFilter};
pub use self::error::ApiError;
pub use self::models::{ModelRecord, ModelUpdate, PurchaseRecord, UserRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let filter = ModelFilter::from_params(Some("bert"), None);
        assert_eq!(filter.like_pattern().unwrap(), "%bert%");
    }
}
