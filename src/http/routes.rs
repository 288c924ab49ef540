//! HTTP routes
//!
//! Handlers stay thin: they extract and validate input, call a core service,
//! and shape the response.

use crate::core::assistant;
use crate::core::digest::StreamingDigest;
use crate::core::intake::{IncomingUpload, DEFAULT_RECENT_LIMIT};
use crate::core::ledger::ProgressView;
use crate::core::ReportSubmission;
use crate::domain::ids::ClientId;
use crate::domain::records::UploadRecord;
use crate::domain::NovaError;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::log_store_degraded;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Banner returned by `GET /`
pub const BANNER: &str = "Nova Enterprises backend running";

/// Longest error excerpt included in diagnostics
const DIAGNOSTIC_ERROR_CHARS: usize = 50;

/// Most collections listed in diagnostics
const DIAGNOSTIC_COLLECTIONS: usize = 10;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub id: String,
    pub sha256: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub ok: bool,
    pub sent: bool,
    pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

// ==================
// Router
// ==================

/// All service routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner_handler))
        .route("/test", get(diagnostics_handler))
        .route("/api/uploads", post(upload_handler))
        .route("/api/uploads/recent", get(recent_uploads_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/report", post(report_handler))
        .route("/api/progress/:client_id", get(progress_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn banner_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: BANNER.to_string(),
    })
}

fn excerpt(err: &NovaError) -> String {
    err.to_string().chars().take(DIAGNOSTIC_ERROR_CHARS).collect()
}

async fn diagnostics_handler(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let mut status = DiagnosticsResponse {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: if state.database_url_set {
            "✅ Set".to_string()
        } else {
            "❌ Not Set".to_string()
        },
        database_name: "❌ Not Set".to_string(),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    match state.store.test_connection().await {
        Ok(()) => {
            status.database = "✅ Available".to_string();
            status.database_name = state.store.database_name().to_string();
            status.connection_status = "Connected".to_string();

            match state.store.list_collections().await {
                Ok(mut collections) => {
                    collections.truncate(DIAGNOSTIC_COLLECTIONS);
                    status.collections = collections;
                    status.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    status.database = format!("⚠️ Connected but Error: {}", excerpt(&e));
                }
            }
        }
        Err(e) if matches!(e, NovaError::Configuration(_)) => {}
        Err(e) => {
            status.database = format!("❌ Error: {}", excerpt(&e));
        }
    }

    Json(status)
}

async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut client_id: Option<String> = None;
    let mut file: Option<(String, Option<String>, StreamingDigest)> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("client_id") => {
                client_id = Some(field.text().await?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);

                let mut digest = StreamingDigest::new();
                while let Some(chunk) = field.chunk().await? {
                    digest.update(&chunk);
                }
                file = Some((filename, content_type, digest));
            }
            _ => {}
        }
    }

    let client_id = client_id
        .ok_or_else(|| NovaError::Validation("Missing form field: client_id".to_string()))?;
    let client_id = ClientId::new(client_id).map_err(NovaError::Validation)?;
    let (filename, content_type, digest) =
        file.ok_or_else(|| NovaError::Validation("Missing form field: file".to_string()))?;

    let receipt = state
        .uploads
        .record_upload(IncomingUpload {
            client_id,
            filename,
            content_type,
            digest: digest.finalize(),
        })
        .await?;

    Ok(Json(UploadResponse {
        ok: true,
        id: receipt.id.to_string(),
        sha256: receipt.sha256.to_string(),
    }))
}

async fn recent_uploads_handler(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<UploadRecord>>, ApiError> {
    match state.uploads.recent(query.limit).await {
        Ok(records) => Ok(Json(records)),
        Err(e) if e.is_unavailable() => {
            log_store_degraded!("/api/uploads/recent", e);
            Ok(Json(Vec::new()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn ask_handler(
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload?;
    let answer = assistant::answer(&request.question)?;

    tracing::debug!(
        client_id = request.client_id.as_deref().unwrap_or(""),
        "Assistant question answered"
    );

    Ok(Json(AskResponse { answer }))
}

async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let Json(submission) = payload?;
    let outcome = state.reports.submit(submission).await?;

    Ok(Json(ReportResponse {
        ok: true,
        sent: outcome.sent,
        owner: outcome.owner.to_string(),
    }))
}

async fn progress_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<ProgressView>, ApiError> {
    // No record can exist for an id that never passes validation
    let Ok(client_id) = ClientId::new(client_id) else {
        return Ok(Json(ProgressView::default()));
    };

    match state.uploads.ledger().progress(&client_id).await {
        Ok(progress) => Ok(Json(progress)),
        Err(e) if e.is_unavailable() => {
            log_store_degraded!("/api/progress", e);
            Ok(Json(ProgressView::default()))
        }
        Err(e) => Err(e.into()),
    }
}
