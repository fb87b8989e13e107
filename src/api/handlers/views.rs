// src/api/handlers/views.rs
use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::AnalyzerError;
use crate::models::{
    ApiError, SelectFileRequest, SubmitOutcome, SubmitRequest, SubmitResponse, REMOTE_ERROR_MESSAGE,
};

fn error_response(e: &AnalyzerError) -> HttpResponse {
    let body = ApiError { error: e.to_string() };
    match e {
        AnalyzerError::ViewNotFound(_) => HttpResponse::NotFound().json(body),
        AnalyzerError::SubmissionInFlight => HttpResponse::Conflict().json(body),
        AnalyzerError::Config(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub async fn open_view(state: web::Data<AppState>) -> Result<HttpResponse> {
    let controller = state.open_view().await;
    Ok(HttpResponse::Created().json(controller.snapshot().await))
}

pub async fn get_view(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match state.view(path.into_inner()).await {
        Ok(controller) => Ok(HttpResponse::Ok().json(controller.snapshot().await)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn close_view(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match state.close_view(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn select_file(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SelectFileRequest>,
) -> Result<HttpResponse> {
    let controller = match state.view(path.into_inner()).await {
        Ok(controller) => controller,
        Err(e) => return Ok(error_response(&e)),
    };

    controller.select_file(&req.name).await;
    Ok(HttpResponse::Ok().json(controller.snapshot().await))
}

pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SubmitRequest>,
) -> Result<HttpResponse> {
    let controller = match state.view(path.into_inner()).await {
        Ok(controller) => controller,
        Err(e) => return Ok(error_response(&e)),
    };

    // Detached so a dropped connection never cancels the remote call.
    let description = req.into_inner().description;
    let worker = controller.clone();
    let outcome = actix_rt::spawn(async move { worker.submit(&description).await })
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let (outcome, message, alert) = match outcome {
        Ok(text) => (SubmitOutcome::Completed, text, None),
        Err(AnalyzerError::RemoteErrorsReturned { .. }) => {
            (SubmitOutcome::RemoteErrorsReturned, REMOTE_ERROR_MESSAGE.to_string(), None)
        }
        Err(AnalyzerError::CallThrew(message)) => {
            let alert = format!("An error occurred: {}", message);
            (SubmitOutcome::CallThrew, alert.clone(), Some(alert))
        }
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(SubmitResponse {
        outcome,
        message,
        alert,
        view: controller.snapshot().await,
    }))
}
