use crate::error::ApiError;
use crate::models::{ProfileResponse, RegisterUserRequest, RegisterUserResponse};
use crate::routes::AppState;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(register_user))
        .route("/profile/{email}", web::get().to(get_profile));
}

/// Idempotent user registration
///
/// POST /users
///
/// A second registration with the same email is a no-op returning a sentinel
/// response, not an error.
async fn register_user(
    state: web::Data<AppState>,
    req: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let inserted = state.postgres.register_user(&req).await?;

    let response = RegisterUserResponse {
        inserted,
        message: if inserted {
            "User registered".to_string()
        } else {
            "User already exists".to_string()
        },
        email: req.email.clone(),
    };

    if inserted {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// Public profile projection
///
/// GET /profile/{email}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = state.postgres.get_user(&path).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}
