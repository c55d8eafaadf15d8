// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use backend::{InMemoryFloorService, ResponseShape, StoredFloor, StoredUnit};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use towerdef::{BuildingTree, DefineOutcome, DefinitionSession, TowerContext};
use towerdef_api::{
    ApiError, SaveReport, WizardHooks, clear_preview, define_floors, save_definitions,
    select_floors,
};
use towerdef_domain::{Block, BlockName, FloorRangeSelection, PendingDefinitions};
use tracing::{debug, error, info, warn};

/// Tower Floor Definition Server - hosts floor definition sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Row shape the in-memory backend answers create-floors calls with
    #[arg(long, value_enum, default_value_t = ResponseShape::Canonical)]
    response_shape: ResponseShape,
}

/// Hooks attached to a hosted session.
///
/// The server has no surrounding wizard; notifications are logged and the
/// completion signal is kept so clients can read it back.
#[derive(Debug)]
struct SessionHooks {
    /// Session identifier, for log context.
    session_id: u64,
    /// Whether the all-floors-persisted hook fired.
    completion_notified: bool,
}

impl WizardHooks for SessionHooks {
    fn definitions_changed(&mut self, definitions: &PendingDefinitions) {
        debug!(
            session_id = self.session_id,
            pending = definitions.len(),
            "Pending definitions changed"
        );
    }

    fn all_floors_persisted(&mut self) {
        info!(session_id = self.session_id, "Every tower floor is saved");
        self.completion_notified = true;
    }
}

/// A hosted session and its hooks.
#[derive(Debug)]
struct SessionEntry {
    session: DefinitionSession,
    hooks: SessionHooks,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Open sessions by id.
    sessions: Arc<Mutex<HashMap<u64, SessionEntry>>>,
    /// Next session id to hand out.
    next_session_id: Arc<AtomicU64>,
    /// The backend that stores floors and units.
    backend: InMemoryFloorService,
}

impl AppState {
    fn new(backend: InMemoryFloorService) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_session_id: Arc::new(AtomicU64::new(1)),
            backend,
        }
    }
}

/// API request for opening a session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionRequest {
    /// The tower identifier.
    tower_id: i64,
    /// The tower name, used in previewed unit codes.
    #[serde(default)]
    tower_name: Option<String>,
    /// The tower's blocks.
    blocks: Vec<Block>,
}

/// API request for a floor pick made on the building diagram.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SelectFloorsRequest {
    /// First floor of the pick.
    from: u32,
    /// Last floor of the pick.
    to: u32,
    /// Blocks of the pick.
    blocks: BTreeSet<BlockName>,
}

/// API response describing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    /// The session identifier.
    session_id: u64,
    /// The tower identifier.
    tower_id: i64,
    /// The current form selection.
    selection: FloorRangeSelection,
    /// Keys of the pending definitions.
    pending: Vec<String>,
    /// Keys saved so far.
    persisted: Vec<String>,
    /// Total floors of the tower.
    expected_floor_count: usize,
    /// Whether every floor is saved.
    completed: bool,
    /// Whether the completion notification fired.
    completion_notified: bool,
}

/// API response for the define action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefineResponse {
    /// Definitions added by this call.
    added: usize,
    /// Pending definitions after the call.
    pending: usize,
    /// The pending definitions.
    definitions: PendingDefinitions,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Service { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn session_not_found(session_id: u64) -> HttpError {
    HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("Session {session_id} not found"),
    }
}

fn session_to_response(session_id: u64, entry: &SessionEntry) -> SessionResponse {
    let session: &DefinitionSession = &entry.session;
    SessionResponse {
        session_id,
        tower_id: session.tower().tower_id,
        selection: session.selection().clone(),
        pending: session.pending().keys().map(ToString::to_string).collect(),
        persisted: session.persisted().iter().map(ToString::to_string).collect(),
        expected_floor_count: session.expected_floor_count(),
        completed: session.is_complete(),
        completion_notified: entry.hooks.completion_notified,
    }
}

/// Handler for POST `/sessions` endpoint.
///
/// Opens a session for a tower.
async fn handle_open_session(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), HttpError> {
    let duplicate: Option<BlockName> = {
        let mut names: BTreeSet<&BlockName> = BTreeSet::new();
        req.blocks
            .iter()
            .find(|b| !names.insert(&b.name))
            .map(|b| b.name.clone())
    };
    if let Some(name) = duplicate {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Block '{name}' is listed more than once"),
        });
    }

    let session_id: u64 = app_state.next_session_id.fetch_add(1, Ordering::Relaxed);
    info!(
        session_id,
        tower_id = req.tower_id,
        blocks = req.blocks.len(),
        "Opening floor definition session"
    );

    let entry: SessionEntry = SessionEntry {
        session: DefinitionSession::new(TowerContext {
            tower_id: req.tower_id,
            tower_name: req.tower_name,
            blocks: req.blocks,
        }),
        hooks: SessionHooks {
            session_id,
            completion_notified: false,
        },
    };
    let response: SessionResponse = session_to_response(session_id, &entry);
    app_state.sessions.lock().await.insert(session_id, entry);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/sessions/{id}` endpoint.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SessionResponse>, HttpError> {
    let sessions = app_state.sessions.lock().await;
    let entry: &SessionEntry = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(session_to_response(session_id, entry)))
}

/// Handler for PUT `/sessions/{id}/selection` endpoint.
///
/// Replaces the form selection.
async fn handle_set_selection(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
    Json(selection): Json<FloorRangeSelection>,
) -> Result<Json<SessionResponse>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let entry: &mut SessionEntry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    debug!(session_id, ?selection, "Replacing selection");
    entry.session.set_selection(selection);
    Ok(Json(session_to_response(session_id, entry)))
}

/// Handler for POST `/sessions/{id}/select_floors` endpoint.
///
/// Applies a floor pick made on the building diagram.
async fn handle_select_floors(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
    Json(req): Json<SelectFloorsRequest>,
) -> Result<Json<SessionResponse>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let entry: &mut SessionEntry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    select_floors(&mut entry.session, req.from, req.to, req.blocks)?;
    Ok(Json(session_to_response(session_id, entry)))
}

/// Handler for POST `/sessions/{id}/define` endpoint.
///
/// Validates the selection and adds its definitions to the pending map.
async fn handle_define(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<DefineResponse>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let entry: &mut SessionEntry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    let outcome: DefineOutcome = define_floors(&mut entry.session, &mut entry.hooks)?;
    Ok(Json(DefineResponse {
        added: outcome.added,
        pending: outcome.pending,
        definitions: entry.session.pending().clone(),
    }))
}

/// Handler for DELETE `/sessions/{id}/pending` endpoint.
///
/// Clears the preview.
async fn handle_clear_pending(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
) -> Result<StatusCode, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let entry: &mut SessionEntry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    clear_preview(&mut entry.session, &mut entry.hooks);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/sessions/{id}/preview` endpoint.
///
/// Returns the building tree with the pending definitions projected onto it.
async fn handle_preview(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<BuildingTree>, HttpError> {
    let sessions = app_state.sessions.lock().await;
    let entry: &SessionEntry = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(entry.session.preview()))
}

/// Handler for POST `/sessions/{id}/save` endpoint.
///
/// Submits the pending definitions to the backend.
async fn handle_save(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SaveReport>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let entry: &mut SessionEntry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let report: SaveReport =
        save_definitions(&mut entry.session, &app_state.backend, &mut entry.hooks)
            .await
            .inspect_err(|e| warn!(session_id, error = %e, "Save failed"))?;
    drop(sessions);

    info!(
        session_id,
        floors = report.floors_created,
        units = report.units_created,
        completed = report.completed,
        "Saved session definitions"
    );
    Ok(Json(report))
}

/// Handler for GET `/backend/floors` endpoint.
async fn handle_list_backend_floors(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<StoredFloor>> {
    Json(app_state.backend.floors().await)
}

/// Handler for GET `/backend/units` endpoint.
async fn handle_list_backend_units(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Vec<StoredUnit>> {
    Json(app_state.backend.units().await)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(handle_open_session))
        .route("/sessions/{session_id}", get(handle_get_session))
        .route("/sessions/{session_id}/selection", put(handle_set_selection))
        .route(
            "/sessions/{session_id}/select_floors",
            post(handle_select_floors),
        )
        .route("/sessions/{session_id}/define", post(handle_define))
        .route("/sessions/{session_id}/pending", delete(handle_clear_pending))
        .route("/sessions/{session_id}/preview", get(handle_preview))
        .route("/sessions/{session_id}/save", post(handle_save))
        .route("/backend/floors", get(handle_list_backend_floors))
        .route("/backend/units", get(handle_list_backend_units))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing tower floor definition server");
    info!(shape = ?args.response_shape, "Using in-memory backend");

    let app_state: AppState = AppState::new(InMemoryFloorService::new(args.response_shape));
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use towerdef_api::{FloorService, ServiceError, UnitDto};

    /// Helper to create test app state with an empty canonical backend.
    fn create_test_app_state() -> AppState {
        AppState::new(InMemoryFloorService::new(ResponseShape::Canonical))
    }

    /// Sends a request and returns the status with the decoded JSON body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let request: Request<Body> = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, value)
    }

    /// Opens a session for tower 7 with blocks A (3 floors) and B (2 floors).
    async fn open_test_session(app: &Router) -> u64 {
        let (status, body) = send(
            app,
            "POST",
            "/sessions",
            Some(json!({
                "towerId": 7,
                "towerName": "T1",
                "blocks": [
                    {"id": 11, "name": "A", "floorCount": 3},
                    {"id": 12, "name": "B", "floorCount": 2}
                ]
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        body["sessionId"].as_u64().unwrap()
    }

    fn regular_selection(blocks: &[&str], from: u32, to: u32) -> Value {
        json!({
            "from": from,
            "to": to,
            "blocks": blocks,
            "floorType": "Regular",
            "codePrefix": "F",
            "unitType": "apartment",
            "unitsCount": 2,
            "startNumber": 1
        })
    }

    #[tokio::test]
    async fn test_open_session_reports_expected_floor_count() {
        let app: Router = build_router(create_test_app_state());

        let session_id: u64 = open_test_session(&app).await;
        let (status, body) = send(&app, "GET", &format!("/sessions/{session_id}"), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["towerId"], 7);
        assert_eq!(body["expectedFloorCount"], 5);
        assert_eq!(body["completed"], false);
        assert_eq!(body["selection"]["from"], 1);
        assert_eq!(body["pending"], json!([]));
    }

    #[tokio::test]
    async fn test_open_session_rejects_duplicate_blocks() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/sessions",
            Some(json!({
                "towerId": 1,
                "blocks": [
                    {"id": 1, "name": "A", "floorCount": 3},
                    {"id": 2, "name": "A", "floorCount": 2}
                ]
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/sessions/99", None).await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        let error_response: ErrorResponse = serde_json::from_value(body).unwrap();
        assert!(error_response.error);
        assert_eq!(error_response.message, "Session 99 not found");
    }

    #[tokio::test]
    async fn test_define_and_preview() {
        let app: Router = build_router(create_test_app_state());
        let session_id: u64 = open_test_session(&app).await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(regular_selection(&["A"], 2, 3)),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) =
            send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["added"], 2);
        assert_eq!(body["definitions"]["A-floor-2"]["floorCode"], "F2");
        assert_eq!(
            body["definitions"]["A-floor-3"]["unitsDefinition"]["count"],
            2
        );

        let (status, tree) =
            send(&app, "GET", &format!("/sessions/{session_id}/preview"), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let floors: &Vec<Value> = tree["blocks"][0]["floors"].as_array().unwrap();
        assert_eq!(floors.len(), 3);
        assert_eq!(floors[0]["isDefined"], false);
        assert_eq!(floors[1]["isDefined"], true);
        assert_eq!(floors[1]["units"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_define_overflow_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let session_id: u64 = open_test_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(regular_selection(&["A", "B"], 1, 3)),
        )
        .await;

        let (status, body) =
            send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("B (2 floors)")
        );
    }

    #[tokio::test]
    async fn test_select_floors_with_unknown_block_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let session_id: u64 = open_test_session(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{session_id}/select_floors"),
            Some(json!({"from": 1, "to": 1, "blocks": ["Z"]})),
        )
        .await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_pending() {
        let app: Router = build_router(create_test_app_state());
        let session_id: u64 = open_test_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(regular_selection(&["A"], 1, 1)),
        )
        .await;
        send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;

        let (status, _) =
            send(&app, "DELETE", &format!("/sessions/{session_id}/pending"), None).await;
        assert_eq!(status, HttpStatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", &format!("/sessions/{session_id}"), None).await;
        assert_eq!(body["pending"], json!([]));
    }

    #[tokio::test]
    async fn test_save_stores_floors_and_reconciled_units() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let session_id: u64 = open_test_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(regular_selection(&["A", "B"], 1, 1)),
        )
        .await;
        send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;

        let (status, report) =
            send(&app, "POST", &format!("/sessions/{session_id}/save"), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(report["floorsCreated"], 2);
        assert_eq!(report["unitsCreated"], 4);
        assert_eq!(report["completed"], false);

        let floors: Vec<StoredFloor> = app_state.backend.floors().await;
        assert_eq!(floors.len(), 2);
        let units: Vec<StoredUnit> = app_state.backend.units().await;
        assert_eq!(units.len(), 4);
        for stored in &units {
            let floor: &StoredFloor = floors
                .iter()
                .find(|f| f.id == stored.unit.block_floor_id)
                .expect("unit points at a created floor");
            assert_eq!(floor.floor.block_id, stored.unit.block_id);
        }

        let (_, body) = send(&app, "GET", "/backend/floors", None).await;
        assert_eq!(body[0]["floor"]["UnitNumberPattern"], "A##01");
    }

    #[tokio::test]
    async fn test_save_with_legacy_backend_rows() {
        let app_state: AppState = AppState::new(InMemoryFloorService::new(ResponseShape::Legacy));
        let app: Router = build_router(app_state.clone());
        let session_id: u64 = open_test_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(regular_selection(&["B"], 1, 2)),
        )
        .await;
        send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;

        let (status, _) = send(&app, "POST", &format!("/sessions/{session_id}/save"), None).await;
        assert_eq!(status, HttpStatusCode::OK);

        let units: Vec<StoredUnit> = app_state.backend.units().await;
        assert_eq!(units.len(), 4);
        assert!(units.iter().all(|u| u.unit.block_floor_id > 0));
    }

    #[tokio::test]
    async fn test_save_with_blank_unit_code_stores_nothing() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let session_id: u64 = open_test_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/sessions/{session_id}/selection"),
            Some(json!({
                "from": 1,
                "to": 1,
                "blocks": ["A"],
                "floorType": "Mixed",
                "codePrefix": "M",
                "mixedUnits": [
                    {"type": "shop", "code": "S-1"},
                    {"type": "office", "code": ""}
                ]
            })),
        )
        .await;
        send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;

        let (status, body) =
            send(&app, "POST", &format!("/sessions/{session_id}/save"), None).await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("A-floor-1"));
        assert!(app_state.backend.floors().await.is_empty());

        let (_, session) = send(&app, "GET", &format!("/sessions/{session_id}"), None).await;
        assert_eq!(session["pending"], json!(["A-floor-1"]));
    }

    #[tokio::test]
    async fn test_save_completes_tower_once() {
        let app: Router = build_router(create_test_app_state());
        let session_id: u64 = open_test_session(&app).await;

        for (blocks, from, to) in [(vec!["A", "B"], 1, 2), (vec!["A"], 3, 3)] {
            send(
                &app,
                "PUT",
                &format!("/sessions/{session_id}/selection"),
                Some(regular_selection(&blocks, from, to)),
            )
            .await;
            send(&app, "POST", &format!("/sessions/{session_id}/define"), None).await;
            let (status, _) =
                send(&app, "POST", &format!("/sessions/{session_id}/save"), None).await;
            assert_eq!(status, HttpStatusCode::OK);
        }

        let (_, body) = send(&app, "GET", &format!("/sessions/{session_id}"), None).await;
        assert_eq!(body["completed"], true);
        assert_eq!(body["completionNotified"], true);
        assert_eq!(body["persisted"].as_array().unwrap().len(), 5);

        let (status, _) = send(&app, "POST", &format!("/sessions/{session_id}/save"), None).await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_backend_rejects_units_for_unknown_floor() {
        let backend: InMemoryFloorService = InMemoryFloorService::new(ResponseShape::Canonical);
        let unit: UnitDto = UnitDto {
            block_floor_id: 42,
            block_id: 1,
            tower_id: 1,
            floor_number: 1,
            unit_number: String::from("01"),
            unit_type: towerdef_domain::UnitType::Apartment,
            status: towerdef_domain::UnitStatus::Available,
            is_active: true,
        };

        let result: Result<(), ServiceError> = backend.create_multiple_units(&[unit]).await;

        assert!(matches!(
            result,
            Err(ServiceError::Rejected { status: 422, .. })
        ));
        assert!(backend.units().await.is_empty());
    }

    #[test]
    fn test_service_error_maps_to_bad_gateway() {
        let err: HttpError = ApiError::from(ServiceError::Request(String::from("timeout"))).into();

        assert_eq!(err.status, HttpStatusCode::BAD_GATEWAY);
        assert!(err.message.contains("timeout"));
    }
}
