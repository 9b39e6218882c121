// 🌐 REST API with Axum
//
// Thin handlers over the record store. Every success is wrapped in
// `ApiResponse { success, data }`; failures come back as
// `{ "success": false, "error": "..." }` with a matching status code.

use crate::dashboard::{finance_summary, Dashboard};
use crate::db;
use crate::error::StoreError;
use crate::models::{
    Appointment, AppointmentPatch, Client, ClientPatch, FinanceEntry, FinanceEntryPatch,
    NewAppointment, NewClient, NewFinanceEntry,
};
use crate::aggregation::FinanceSummary;
use crate::temporal::{local_now, parse_instant, TemporalAnchors};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// ============================================================================
// State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    clock: fn() -> NaiveDateTime,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self::with_clock(conn, local_now)
    }

    /// Use a fixed or fake clock for "now" (tests, replays).
    pub fn with_clock(conn: Connection, clock: fn() -> NaiveDateTime) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            clock,
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(StoreError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(err @ StoreError::UnknownClient(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Store(err @ StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Finance totals plus the anchors they were computed from
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub anchors: TemporalAnchors,
    #[serde(flatten)]
    pub totals: FinanceSummary,
}

#[derive(Debug, Deserialize)]
pub struct FromQuery {
    from: Option<String>,
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}

fn parse_from(raw: Option<&str>) -> ApiResult<Option<NaiveDateTime>> {
    raw.map(|s| {
        parse_instant(s).ok_or_else(|| ApiError::BadRequest(format!("Invalid from: {s}")))
    })
    .transpose()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/clients - All clients by name
async fn get_clients(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Client>>>> {
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::list_clients(&conn)?)))
}

/// POST /api/clients
async fn post_client(
    State(state): State<AppState>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Client>>)> {
    let Json(input) = payload?;
    let conn = state.conn()?;
    let client = db::create_client(&conn, input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(client))))
}

/// PUT /api/clients/:id
async fn put_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClientPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Client>>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::update_client(&conn, id, patch)?)))
}

/// DELETE /api/clients/:id
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let conn = state.conn()?;
    db::delete_client(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/appointments?from= - Appointments from `from` (default: now)
async fn get_appointments(
    State(state): State<AppState>,
    Query(query): Query<FromQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Appointment>>>> {
    let from = parse_from(query.from.as_deref())?.unwrap_or_else(|| state.now());
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::list_appointments(&conn, from)?)))
}

/// POST /api/appointments
async fn post_appointment(
    State(state): State<AppState>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let Json(input) = payload?;
    let conn = state.conn()?;
    let appointment = db::create_appointment(&conn, input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(appointment))))
}

/// PUT /api/appointments/:id
async fn put_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Appointment>>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::update_appointment(&conn, id, patch)?)))
}

/// DELETE /api/appointments/:id
async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let conn = state.conn()?;
    db::delete_appointment(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/finance?from= - Entries newest first
async fn get_finance_entries(
    State(state): State<AppState>,
    Query(query): Query<FromQuery>,
) -> ApiResult<Json<ApiResponse<Vec<FinanceEntry>>>> {
    let from = parse_from(query.from.as_deref())?;
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::list_finance_entries(&conn, from)?)))
}

/// POST /api/finance
async fn post_finance_entry(
    State(state): State<AppState>,
    payload: Result<Json<NewFinanceEntry>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FinanceEntry>>)> {
    let Json(input) = payload?;
    let conn = state.conn()?;
    let entry = db::create_finance_entry(&conn, input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

/// PUT /api/finance/:id
async fn put_finance_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FinanceEntryPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<FinanceEntry>>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::update_finance_entry(&conn, id, patch)?)))
}

/// DELETE /api/finance/:id
async fn delete_finance_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let conn = state.conn()?;
    db::delete_finance_entry(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/finance/summary - Daily / weekly / monthly totals
async fn get_finance_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SummaryResponse>>> {
    let now = state.now();
    let conn = state.conn()?;
    let totals = finance_summary(&conn, now)?;
    let anchors = TemporalAnchors::at(now);
    Ok(Json(ApiResponse::ok(SummaryResponse { anchors, totals })))
}

/// GET /api/dashboard - Today's schedule, upcoming bookings, finance highlights
async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Dashboard>>> {
    let now = state.now();
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(Dashboard::load(&conn, now)?)))
}

// ============================================================================
// Router
// ============================================================================

/// API routes, without middleware
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/clients", get(get_clients).post(post_client))
        .route("/clients/:id", put(put_client).delete(delete_client))
        .route("/appointments", get(get_appointments).post(post_appointment))
        .route("/appointments/:id", put(put_appointment).delete(delete_appointment))
        .route("/finance", get(get_finance_entries).post(post_finance_entry))
        .route("/finance/summary", get(get_finance_summary))
        .route("/finance/:id", put(put_finance_entry).delete(delete_finance_entry))
        .route("/dashboard", get(get_dashboard))
}

/// Full application: `/api/*` plus tracing and CORS layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
