use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post, put},
};
use dashboard_flow::{
    AnalysisStrategy, AuthProvider, AuthState, CannedTextGenerator, Catalog, Claim,
    DashboardError, LocalAuthProvider, OpenRouterGenerator, PageView, PlaceholderStrategy,
    ResponseStrategy, Screen, Section, Shell, TextGenerator, User, Workspace,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, info, warn};
use uuid::Uuid;

use crate::config::{ServiceConfig, StrategyKind};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn unauthorized_error() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Sign in to access the dashboard" })),
    )
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "id": id
        })),
    )
}

fn conflict_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": message,
            "id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn dashboard_error(error: DashboardError) -> ApiError {
    match &error {
        DashboardError::RecordNotFound(id) => not_found_error("Record not found", id),
        DashboardError::UnknownSetting(key) => not_found_error("Unknown setting", key),
        DashboardError::AnalysisInFlight(id) => {
            conflict_error("Analysis already in progress", id)
        }
        DashboardError::SelectionUnsupported(_) | DashboardError::UnknownSection(_) => {
            bad_request_error(&error.to_string())
        }
        _ => internal_error("Dashboard operation failed", &error.to_string()),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<Shell>,
    pub workspace: Workspace,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub section: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub record_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}

pub fn create_app(config: &ServiceConfig) -> dashboard_flow::Result<Router> {
    let app_state = create_app_state(config)?;
    Ok(build_router(app_state))
}

/// Seed the workspace and mount a signed-out shell for the configured operator
pub fn create_app_state(config: &ServiceConfig) -> dashboard_flow::Result<AppState> {
    let workspace = Workspace::new(
        Catalog::builtin()?,
        create_generator(config),
        create_strategy(config.strategy),
        config.analysis,
    );

    let provider = Arc::new(LocalAuthProvider::new(config.operator.clone()));
    provider.restore(None);
    let provider: Arc<dyn AuthProvider> = provider;

    Ok(AppState {
        shell: Arc::new(Shell::mount(provider, workspace.clone())),
        workspace,
    })
}

fn create_generator(config: &ServiceConfig) -> Arc<dyn TextGenerator> {
    match &config.openrouter_api_key {
        Some(api_key) => {
            info!(model = %config.openrouter_model, "Using OpenRouter text generation");
            Arc::new(OpenRouterGenerator::new(api_key, config.openrouter_model.clone()))
        }
        None => {
            warn!("OPENROUTER_API_KEY not set, using canned text generation");
            Arc::new(CannedTextGenerator::default())
        }
    }
}

fn create_strategy(kind: StrategyKind) -> Arc<dyn AnalysisStrategy> {
    match kind {
        StrategyKind::Placeholder => Arc::new(PlaceholderStrategy),
        StrategyKind::Response => Arc::new(ResponseStrategy::new(PlaceholderStrategy)),
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/screen", get(get_screen))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/section", put(navigate))
        .route("/pages/{section}", get(get_page))
        .route("/pages/{section}/search", put(set_search))
        .route(
            "/pages/{section}/selection",
            put(select_record).delete(dismiss_record),
        )
        .route("/settings/{key}", put(set_toggle))
        .route("/claims/{id}", get(get_claim))
        .route("/claims/{id}/analysis", post(start_analysis))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag each request with a correlation ID and run it inside a span carrying it
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request.headers_mut().insert("x-correlation-id", value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert("x-correlation-id", value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Insurance Dashboard Service",
        "version": "0.1.0",
        "description": "Back-office dashboard for policies, claims, clients and documents",
        "endpoints": {
            "GET /screen": "Current screen for the signed-in operator",
            "POST /auth/login": "Sign in the operator",
            "POST /auth/logout": "Sign out",
            "PUT /section": "Change the active section",
            "GET /pages/{section}": "Render one section's page",
            "PUT /pages/{section}/search": "Filter the section's records",
            "PUT /pages/{section}/selection": "Open a record's detail view",
            "DELETE /pages/{section}/selection": "Close the detail view",
            "PUT /settings/{key}": "Flip a settings toggle",
            "GET /claims/{id}": "Get a claim",
            "POST /claims/{id}/analysis": "Start AI analysis for a claim",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

fn require_user(state: &AppState) -> Result<User, ApiError> {
    state.shell.auth_state().user.ok_or_else(unauthorized_error)
}

fn parse_section(raw: &str) -> Result<Section, ApiError> {
    raw.parse().map_err(dashboard_error)
}

async fn get_screen(State(state): State<AppState>) -> Json<Screen> {
    Json(state.shell.render())
}

async fn login(State(state): State<AppState>) -> ApiResult<AuthState> {
    state.shell.login().await.map_err(dashboard_error)?;
    Ok(Json(state.shell.auth_state()))
}

async fn logout(State(state): State<AppState>) -> ApiResult<AuthState> {
    state.shell.logout().await.map_err(dashboard_error)?;
    Ok(Json(state.shell.auth_state()))
}

async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<Screen> {
    let section = parse_section(&request.section)?;
    state.shell.navigate(section);
    Ok(Json(state.shell.render()))
}

async fn get_page(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> ApiResult<PageView> {
    let section = parse_section(&section)?;
    require_user(&state)?;
    Ok(Json(state.workspace.render(section)))
}

async fn set_search(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<PageView> {
    let section = parse_section(&section)?;
    require_user(&state)?;

    state
        .workspace
        .set_search(section, &request.text)
        .map_err(dashboard_error)?;
    Ok(Json(state.workspace.render(section)))
}

async fn select_record(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<PageView> {
    let section = parse_section(&section)?;
    require_user(&state)?;

    state
        .workspace
        .select(section, &request.record_id)
        .map_err(dashboard_error)?;
    Ok(Json(state.workspace.render(section)))
}

async fn dismiss_record(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> ApiResult<PageView> {
    let section = parse_section(&section)?;
    require_user(&state)?;

    state.workspace.dismiss(section);
    Ok(Json(state.workspace.render(section)))
}

async fn set_toggle(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<PageView> {
    require_user(&state)?;

    state
        .workspace
        .set_toggle(&key, request.enabled)
        .map_err(dashboard_error)?;
    Ok(Json(state.workspace.render(Section::Settings)))
}

async fn get_claim(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Claim> {
    require_user(&state)?;
    state.workspace.claim(&id).map(Json).map_err(dashboard_error)
}

async fn start_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_user(&state)?;

    let handle = state.workspace.analyze_claim(&id).map_err(dashboard_error)?;
    let run_id = handle.run_id;
    info!(claim_id = %id, run_id = %run_id, "Analysis accepted");

    tokio::spawn(async move {
        let claim_id = handle.claim_id.clone();
        let outcome = handle.wait().await;
        info!(claim_id = %claim_id, outcome = ?outcome, "Analysis finished");
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "claim_id": id,
            "run_id": run_id,
            "status": "processing"
        })),
    ))
}
