// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "media-analyzer",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// Who the injected session belongs to, for the page header.
pub async fn get_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "username": state.username() })))
}
