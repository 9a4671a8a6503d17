//! JSON HTTP server.
//!
//! Exposes the knowledge base to the browser front end. The caller's
//! identity comes from the `x-user-email` header; write routes require
//! that account to be an admin.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/faqs?q=&category=` | Filter records (not logged) |
//! | `POST` | `/search` | Explicit search: filter and log the keyword |
//! | `GET`  | `/faqs/{id}` | One record with rendered answer; counts a view |
//! | `POST` | `/faqs` | Create (admin) |
//! | `PUT`  | `/faqs/{id}` | Replace (admin) |
//! | `DELETE` | `/faqs/{id}` | Delete (admin) |
//! | `POST` | `/faqs/{id}/helpful` | Helpful vote |
//! | `GET`  | `/categories`, `/recent`, `/popular` | Projections |
//! | `GET`  | `/analytics` | Top keywords (admin) |
//! | `POST` | `/import` | CSV body import (admin) |
//! | `GET`  | `/export` | CSV download (admin) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "forbidden", "message": "permission denied: sign in as an admin first" } }
//! ```
//!
//! Error codes: `bad_request` (400), `forbidden` (403), `not_found` (404),
//! `backend_unavailable` (503).
//!
//! Helpful-vote de-duplication is per client and lives with the client's
//! own preferences; this server counts every vote it receives.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use quickknowledge_core::models::{Counter, FaqDraft, FaqRecord, KeywordStat};
use quickknowledge_core::ranking;
use quickknowledge_core::search::{self as filter, FilterQuery};
use quickknowledge_core::session::{AdminDirectory, Session, User};
use quickknowledge_core::store::FaqStore;
use quickknowledge_core::FaqError;

use crate::analytics::keyword_report;
use crate::config::Config;
use crate::context::Admins;
use crate::db;
use crate::export::export_csv;
use crate::get::{open_faq, render_view, FaqView};
use crate::identity::USER_HEADER;
use crate::import_cmd::{import_text, ImportSummary};
use crate::search::search_faqs;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<SqliteStore>,
    admins: Arc<Admins>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<SqliteStore>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            admins: Arc::new(AdminDirectory::new(
                Arc::clone(&store),
                &config.auth.super_admin,
            )),
            store,
        }
    }

    /// Session for the account named in the request headers.
    async fn session(&self, headers: &HeaderMap) -> Session {
        let user = headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| v.contains('@'))
            .map(|email| User::from_email(email.to_lowercase()));
        Session::establish(user, &self.admins).await
    }

    async fn require_admin(&self, headers: &HeaderMap) -> Result<(), AppError> {
        self.session(headers).await.require_admin()?;
        Ok(())
    }
}

/// Starts the HTTP server on `[server].bind` and runs until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    let state = AppState::new(config, Arc::new(SqliteStore::new(pool)));
    let bind_addr = config.server.bind.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind = %bind_addr, "server started");
    println!("QuickKnowledge listening on http://{}", bind_addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/faqs", get(handle_list).post(handle_create))
        .route(
            "/faqs/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .route("/faqs/{id}/helpful", post(handle_helpful))
        .route("/search", post(handle_search))
        .route("/categories", get(handle_categories))
        .route("/recent", get(handle_recent))
        .route("/popular", get(handle_popular))
        .route("/analytics", get(handle_analytics))
        .route("/import", post(handle_import))
        .route("/export", get(handle_export))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        let (status, code) = match &err {
            FaqError::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            FaqError::Permission(_) => (StatusCode::FORBIDDEN, "forbidden"),
            FaqError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            FaqError::BackendUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable")
            }
        };
        let mut message = err.to_string();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            message.push_str(" (try again shortly)");
        }
        AppError {
            status,
            code,
            message,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        FaqError::backend(&err).into()
    }
}

fn not_found(id: &str) -> AppError {
    FaqError::NotFound(format!("faq {}", id)).into()
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<FaqRecord>>, AppError> {
    Ok(Json(search_faqs(state.store.as_ref(), &query, false).await?))
}

async fn handle_search(
    State(state): State<AppState>,
    Json(query): Json<FilterQuery>,
) -> Result<Json<Vec<FaqRecord>>, AppError> {
    Ok(Json(search_faqs(state.store.as_ref(), &query, true).await?))
}

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FaqView>, AppError> {
    let record = open_faq(state.store.as_ref(), &id).await?;
    Ok(Json(render_view(record, false, false)))
}

#[derive(Serialize)]
struct CreatedResponse {
    id: String,
}

async fn handle_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<FaqDraft>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    state.require_admin(&headers).await?;
    draft.validate()?;
    let id = state.store.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn handle_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<FaqDraft>,
) -> Result<StatusCode, AppError> {
    state.require_admin(&headers).await?;
    draft.validate()?;
    if state.store.get_by_id(&id).await?.is_none() {
        return Err(not_found(&id));
    }
    state.store.update(&id, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.require_admin(&headers).await?;
    if state.store.get_by_id(&id).await?.is_none() {
        return Err(not_found(&id));
    }
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct HelpfulResponse {
    helpful_count: i64,
}

async fn handle_helpful(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HelpfulResponse>, AppError> {
    if state.store.get_by_id(&id).await?.is_none() {
        return Err(not_found(&id));
    }
    let helpful_count = state.store.increment(&id, Counter::Helpful).await?;
    Ok(Json(HelpfulResponse { helpful_count }))
}

async fn handle_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let records = state.store.get_all().await?;
    Ok(Json(filter::categories(&records)))
}

async fn handle_recent(State(state): State<AppState>) -> Result<Json<Vec<FaqRecord>>, AppError> {
    let records = state.store.get_all().await?;
    let settings = &state.config.ranking;
    Ok(Json(ranking::recent_within(
        &records,
        chrono::Utc::now().timestamp(),
        settings.recent_days,
        settings.recent_limit,
    )))
}

async fn handle_popular(State(state): State<AppState>) -> Result<Json<Vec<FaqRecord>>, AppError> {
    let records = state.store.get_all().await?;
    Ok(Json(ranking::popular(
        &records,
        state.config.ranking.popular_limit,
    )))
}

async fn handle_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<KeywordStat>>, AppError> {
    state.require_admin(&headers).await?;
    let now = chrono::Utc::now().timestamp();
    let stats = keyword_report(state.store.as_ref(), &state.config.analytics, now).await?;
    Ok(Json(stats))
}

async fn handle_import(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    state.require_admin(&headers).await?;
    Ok(Json(import_text(state.store.as_ref(), &body).await?))
}

async fn handle_export(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.require_admin(&headers).await?;
    let (filename, body, _) = export_csv(state.store.as_ref()).await?;
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
