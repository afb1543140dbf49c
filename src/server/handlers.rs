//! HTTP request handlers for the API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::models::UploadedFile;
use crate::pipeline::{filter_documents, Folder, SessionStats};
use crate::services::{ClientPortal, QueueKind};

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    tracing::error!("Request failed: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Body of a processing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

/// Classify uploaded file descriptors.
///
/// With a client email the results are filed into that client's portal;
/// otherwise they are kept as session documents.
pub async fn process_document(
    State(state): State<AppState>,
    Json(body): Json<ProcessRequest>,
) -> Response {
    if body.files.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No files provided");
    }

    let results = state.pipeline.process_batch(&body.files, None).await;

    let client_email = body
        .client_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    match client_email {
        Some(email) => {
            let portal = ClientPortal::new(email, state.pipeline.clone(), state.records.clone());
            for result in &results {
                if let Err(e) = portal.file_processed(result).await {
                    return internal_error(e);
                }
            }
        }
        None => {
            if let Err(e) = state.records.append_session_documents(&results).await {
                return internal_error(e);
            }
        }
    }

    Json(serde_json::json!({
        "success": true,
        "results": results,
    }))
    .into_response()
}

/// Folder filter parameters.
#[derive(Debug, Deserialize)]
pub struct FolderParams {
    pub folder: Option<String>,
}

/// Session documents in a folder, with session counters.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<FolderParams>,
) -> Response {
    let folder = match params.folder.as_deref() {
        None => Folder::All,
        Some(name) => match Folder::from_str(name) {
            Some(folder) => folder,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Unknown folder: {}", name),
                )
            }
        },
    };

    let docs = match state.records.session_documents().await {
        Ok(docs) => docs,
        Err(e) => return internal_error(e),
    };

    Json(serde_json::json!({
        "folder": folder.as_str(),
        "stats": SessionStats::from_documents(&docs),
        "documents": filter_documents(&docs, folder),
    }))
    .into_response()
}

/// All client accounts with document counts.
pub async fn list_clients(State(state): State<AppState>) -> Response {
    match state.dashboard.clients().await {
        Ok(clients) => Json(clients).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Queue filter parameters.
#[derive(Debug, Deserialize)]
pub struct QueueParams {
    pub filter: Option<String>,
}

/// Open review queue, optionally filtered by kind.
pub async fn list_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
) -> Response {
    let kind = match params.filter.as_deref() {
        None | Some("all") => None,
        Some(name) => match QueueKind::from_str(name) {
            Some(kind) => Some(kind),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Unknown queue filter: {}", name),
                )
            }
        },
    };

    match state.dashboard.filter_queue(kind).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Dashboard headline numbers.
pub async fn dashboard_stats(State(state): State<AppState>) -> Response {
    match state.dashboard.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => internal_error(e),
    }
}
