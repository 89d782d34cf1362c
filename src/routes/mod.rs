// Route exports
pub mod models;
pub mod purchases;
pub mod users;

use crate::core::auth::parse_bearer;
use crate::error::ApiError;
use crate::models::HealthResponse;
use crate::services::{IdentityClient, PostgresClient, VerifiedIdentity};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityClient>,
    pub postgres: Arc<PostgresClient>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .configure(models::configure)
        .configure(purchases::configure)
        .configure(users::configure);
}

/// Resolve the caller's verified identity from the Authorization header.
///
/// A missing or malformed header is rejected before the identity provider is
/// consulted; a provider rejection maps to 401.
pub async fn authenticate(
    req: &HttpRequest,
    state: &AppState,
) -> Result<VerifiedIdentity, ApiError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::AuthenticationMissing)?;

    let token = parse_bearer(header).ok_or(ApiError::AuthenticationMissing)?;

    Ok(state.identity.verify_token(token).await?)
}

/// Parse an opaque model id from a path segment; malformed ids are a client
/// error, not a server crash.
pub fn parse_model_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidIdentifier(raw.to_string()))
}

/// Liveness text
async fn index() -> impl Responder {
    HttpResponse::Ok().body("AI Model Inventory API running")
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_id_ok() {
        let id = parse_model_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn test_parse_model_id_malformed() {
        assert!(matches!(
            parse_model_id("not-a-uuid"),
            Err(ApiError::InvalidIdentifier(_))
        ));
    }
}
