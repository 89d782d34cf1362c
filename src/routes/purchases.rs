use crate::error::ApiError;
use crate::models::PurchaseResponse;
use crate::routes::{authenticate, parse_model_id, AppState};
use actix_web::{web, HttpRequest, HttpResponse};

/// Configure purchase and dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/my-Purchase/{id}", web::post().to(purchase_model))
        .route("/my-Purchase", web::get().to(my_purchases))
        .route("/dashboard-stats", web::get().to(dashboard_stats));
}

/// Purchase a model for the caller
///
/// POST /my-Purchase/{id}
///
/// Appends the verified email to the purchaser list, bumps the counter, and
/// records the denormalized ledger entry in one transaction. A repeat attempt
/// is a conflict with no side effect; a missing model is a 404.
async fn purchase_model(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;
    let id = parse_model_id(&path)?;

    let (purchase, downloads) = state.postgres.purchase_model(id, &caller.email).await?;

    Ok(HttpResponse::Created().json(PurchaseResponse {
        purchase,
        downloads: downloads.max(0) as usize,
    }))
}

/// The caller's purchase ledger, newest first
///
/// GET /my-Purchase
async fn my_purchases(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;
    let purchases = state.postgres.purchases_by_email(&caller.email).await?;
    Ok(HttpResponse::Ok().json(purchases))
}

/// Marketplace aggregates: model count, user count, total downloads
///
/// GET /dashboard-stats
///
/// Recomputed from current store contents on every call.
async fn dashboard_stats(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authenticate(&http_req, &state).await?;

    let stats = state.postgres.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
