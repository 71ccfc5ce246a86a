//! HTTP handler functions for the road safety API.

use actix_web::{HttpResponse, web};
use road_safety_api::ApiError;
use road_safety_api_models::{ApiErrorBody, ApiHealth, HotspotQueryParams, PredictionInput};
use road_safety_session_models::{LoginRequest, SignupRequest};

use crate::{AppState, DEFAULT_HOTSPOT_LIMIT, MAX_HOTSPOT_LIMIT};

fn error_body(message: impl Into<String>) -> ApiErrorBody {
    ApiErrorBody {
        error: message.into(),
    }
}

/// Maps a backend failure onto a status code and `{ "error": ... }` body.
fn error_response(err: &ApiError) -> HttpResponse {
    match err {
        ApiError::InvalidCredentials => HttpResponse::Unauthorized().json(error_body(err.to_string())),
        ApiError::MissingFields => HttpResponse::BadRequest().json(error_body(err.to_string())),
        _ => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/auth/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    match state.api.login(&body.email, &body.password).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/auth/signup`
pub async fn signup(state: web::Data<AppState>, body: web::Json<SignupRequest>) -> HttpResponse {
    match state.api.signup(&body).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/predict`
pub async fn predict(state: web::Data<AppState>, body: web::Json<PredictionInput>) -> HttpResponse {
    match state.api.predict(&body).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/data/stats`
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    match state.api.get_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/data/hotspots`
///
/// Returns `limit` accident records (default 20, at most 1000).
pub async fn hotspots(
    state: web::Data<AppState>,
    params: web::Query<HotspotQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(DEFAULT_HOTSPOT_LIMIT);
    if limit > MAX_HOTSPOT_LIMIT {
        return HttpResponse::UnprocessableEntity().json(error_body(format!(
            "limit must be at most {MAX_HOTSPOT_LIMIT}"
        )));
    }

    match state.api.get_hotspots(limit).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/admin/stats`
pub async fn admin_stats(state: web::Data<AppState>) -> HttpResponse {
    match state.api.get_admin_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/admin/users`
pub async fn admin_users(state: web::Data<AppState>) -> HttpResponse {
    match state.api.get_admin_users().await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => error_response(&e),
    }
}
