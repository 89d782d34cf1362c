// Service exports
pub mod identity;
pub mod postgres;

pub use identity::{IdentityClient, IdentityError, VerifiedIdentity};
pub use postgres::{PostgresClient, StoreError};
