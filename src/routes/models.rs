use crate::core::{sanitize_update, ModelFilter};
use crate::error::ApiError;
use crate::models::{CreateModelRequest, DashboardModel, FindModelsQuery, SearchQuery};
use crate::routes::{authenticate, parse_model_id, AppState};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{Map, Value};
use validator::Validate;

/// Configure all model routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/models", web::get().to(list_models))
        .route("/models", web::post().to(create_model))
        .route("/models/{id}", web::get().to(get_model))
        .route("/models/{id}", web::patch().to(update_model))
        .route("/models/{id}", web::delete().to(delete_model))
        .route("/recent-model", web::get().to(recent_models))
        .route("/my-models", web::get().to(my_models))
        .route("/findmodels", web::get().to(find_models))
        .route("/search", web::get().to(search_models))
        .route("/dashboard-models", web::get().to(dashboard_models));
}

/// List all models
///
/// GET /models
async fn list_models(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let models = state.postgres.list_models(&ModelFilter::default()).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// The 6 most recently created models, newest first
///
/// GET /recent-model
async fn recent_models(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let models = state.postgres.recent_models().await?;
    Ok(HttpResponse::Ok().json(models))
}

/// Fetch a model by id
///
/// GET /models/{id}
async fn get_model(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_model_id(&path)?;
    let model = state.postgres.get_model(id).await?;
    Ok(HttpResponse::Ok().json(model))
}

/// Create a model listing
///
/// POST /models
///
/// The owner is the verified caller; the purchaser list starts empty.
async fn create_model(
    state: web::Data<AppState>,
    req: web::Json<CreateModelRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;

    req.validate()?;

    let model = state.postgres.insert_model(&req, &caller.email).await?;

    Ok(HttpResponse::Created().json(model))
}

/// Partially update a model
///
/// PATCH /models/{id}
///
/// Owner-only. The payload is sanitized before it touches the store: id,
/// owner, purchaser list, counter, and timestamps are stripped, the rest is
/// validated and applied, and updatedAt is stamped server-side.
async fn update_model(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;
    let id = parse_model_id(&path)?;

    let update = sanitize_update(payload.into_inner())?;

    let existing = state.postgres.get_model(id).await?;
    if !existing.is_owned_by(&caller.email) {
        return Err(ApiError::Forbidden(
            "Only the owner can update this model".to_string(),
        ));
    }

    let model = state.postgres.update_model(id, &update).await?;

    Ok(HttpResponse::Ok().json(model))
}

/// Delete a model
///
/// DELETE /models/{id}
///
/// Owner-only, same check as update.
async fn delete_model(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;
    let id = parse_model_id(&path)?;

    let existing = state.postgres.get_model(id).await?;
    if !existing.is_owned_by(&caller.email) {
        return Err(ApiError::Forbidden(
            "Only the owner can delete this model".to_string(),
        ));
    }

    state.postgres.delete_model(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "deleted": true,
        "id": id,
    })))
}

/// Models owned by the caller
///
/// GET /my-models
///
/// The owner email comes from the verified token, never from a query
/// parameter.
async fn my_models(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(&http_req, &state).await?;
    let models = state.postgres.models_by_owner(&caller.email).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// Search and filter models
///
/// GET /findmodels?search=bert&framework=TensorFlow,PyTorch
///
/// Search is a case-insensitive substring across name, framework, and
/// dataset; the framework list is a case-insensitive exact match; both
/// combine with AND.
async fn find_models(
    state: web::Data<AppState>,
    query: web::Query<FindModelsQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = ModelFilter::from_params(query.search.as_deref(), query.framework.as_deref());
    let models = state.postgres.list_models(&filter).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// Substring search on the name field only
///
/// GET /search?search=resnet
async fn search_models(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let pattern = ModelFilter::from_params(query.search.as_deref(), None).like_pattern();
    let models = state.postgres.search_models_by_name(pattern).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// Projected model list for the dashboard
///
/// GET /dashboard-models
///
/// Restricted to {name, framework, createdAt, purchasedBy} plus a download
/// count derived from the purchaser list when the response is built.
async fn dashboard_models(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authenticate(&http_req, &state).await?;

    let models = state.postgres.list_models(&ModelFilter::default()).await?;
    let projected: Vec<DashboardModel> = models.into_iter().map(DashboardModel::from).collect();

    Ok(HttpResponse::Ok().json(projected))
}
