use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lucky_fruit_core::{ConfigError, EngineConfig, RoundEngine, Symbol};
use lucky_fruit_shared::{
    AccountView, AdminGrantRequest, AdminSetSlotRequest, ApiError, HistoryItem, HistoryResponse,
    OverrideStatusResponse, SpinRequest, SpinResponse,
};

#[derive(Parser, Debug)]
#[command(name = "lucky-fruit-server", about = "HTTP service for the Lucky Fruit round engine")]
struct Settings {
    /// Address to listen on
    #[arg(long, env = "BIND", default_value = "127.0.0.1:8080")]
    bind: String,
    /// Bearer token required by /admin routes
    #[arg(long, env = "API_KEY", default_value = "dev-key")]
    api_key: String,
    /// JSON engine configuration; built-in defaults when omitted
    #[arg(long, env = "ENGINE_CONFIG")]
    engine_config: Option<std::path::PathBuf>,
}

struct AppState {
    engine: RoundEngine,
    config: EngineConfig,
    api_key: String,
}

impl AppState {
    fn new(config: EngineConfig, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: RoundEngine::new(&config)?,
            config,
            api_key: api_key.into(),
        })
    }
}

struct AppError(ApiError);

impl<E: Into<ApiError>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

type AppResult<T> = Result<T, AppError>;

fn authorize(state: &AppState, bearer: &Bearer) -> AppResult<()> {
    if bearer.token() != state.api_key {
        warn!("rejected admin request with bad token");
        return Err(ApiError::Unauthorized.into());
    }
    Ok(())
}

async fn route_spin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpinRequest>,
) -> AppResult<Json<SpinResponse>> {
    if req.user.trim().is_empty() {
        return Err(ApiError::Invalid("user must not be empty".into()).into());
    }
    if !state.config.is_allowed_wager(req.wager) {
        return Err(ApiError::Invalid(format!(
            "wager {} is not one of {:?}",
            req.wager, state.config.allowed_wagers
        ))
        .into());
    }
    let res = state.engine.spin(&req.user, req.wager)?;
    Ok(Json(res.into()))
}

async fn route_account(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Json<AccountView> {
    let account = state.engine.account(&user);
    Json(AccountView::new(user, account))
}

async fn route_accounts(State(state): State<Arc<AppState>>) -> Json<Vec<AccountView>> {
    Json(
        state
            .engine
            .accounts()
            .into_iter()
            .map(|(user, account)| AccountView::new(user, account))
            .collect(),
    )
}

async fn route_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        current_round: state.engine.current_round(),
        as_of: chrono::Utc::now(),
        entries: state
            .engine
            .history()
            .into_iter()
            .map(HistoryItem::from)
            .collect(),
    })
}

async fn route_admin_grant(
    State(state): State<Arc<AppState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<AdminGrantRequest>,
) -> AppResult<Json<AccountView>> {
    authorize(&state, &bearer)?;
    if req.amount == 0 {
        return Err(ApiError::Invalid("amount must be positive".into()).into());
    }
    let account = state.engine.grant(&req.user, req.amount);
    Ok(Json(AccountView::new(req.user, account)))
}

async fn route_admin_set_slot(
    State(state): State<Arc<AppState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<AdminSetSlotRequest>,
) -> AppResult<Json<OverrideStatusResponse>> {
    authorize(&state, &bearer)?;
    let symbol = req
        .symbol
        .as_deref()
        .map(str::parse::<Symbol>)
        .transpose()?;
    state.engine.set_override_slot(req.position, symbol)?;
    Ok(Json(state.engine.override_status().into()))
}

async fn route_admin_clear(
    State(state): State<Arc<AppState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> AppResult<Json<OverrideStatusResponse>> {
    authorize(&state, &bearer)?;
    state.engine.clear_override();
    Ok(Json(state.engine.override_status().into()))
}

async fn route_admin_arm(
    State(state): State<Arc<AppState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> AppResult<Json<OverrideStatusResponse>> {
    authorize(&state, &bearer)?;
    state.engine.arm_override()?;
    Ok(Json(state.engine.override_status().into()))
}

async fn route_admin_override_status(
    State(state): State<Arc<AppState>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> AppResult<Json<OverrideStatusResponse>> {
    authorize(&state, &bearer)?;
    Ok(Json(state.engine.override_status().into()))
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/spin", post(route_spin))
        .route("/accounts", get(route_accounts))
        .route("/accounts/:user", get(route_account))
        .route("/history", get(route_history))
        .route("/admin/grant", post(route_admin_grant))
        .route("/admin/override", get(route_admin_override_status))
        .route("/admin/override/slot", post(route_admin_set_slot))
        .route("/admin/override/clear", post(route_admin_clear))
        .route("/admin/override/arm", post(route_admin_arm))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let settings = Settings::parse();

    let config = match &settings.engine_config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    info!(
        starting_balance = config.starting_balance,
        players = config.players.len(),
        seeded = config.seed.is_some(),
        "engine configured"
    );
    let state = Arc::new(AppState::new(config, settings.api_key)?);

    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    info!("listening on {}", settings.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
