//! BioCore Nucle API server
//!
//! Thin HTTP layer over the verification core: request parsing, CORS, audit
//! logging, and generic error responses. All verification logic lives in
//! `biocore-core`; this binary only wires configuration, transport, and
//! routes together.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use biocore_core::bridge::{
    AuthResult, BridgeError, HttpKernelTransport, KernelTransport, StubKernelTransport,
    TrustBridge,
};
use biocore_core::config::BiocoreConfig;
use biocore_core::fingerprint::FingerprintEngine;
use biocore_core::gateway::{AuthError, BioAuthRequest, Gateway};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "biocore",
    about = "BioCore Nucle API - biometric identity verification gateway",
    version
)]
struct Cli {
    /// Port to listen on
    #[clap(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Log level (overridden by RUST_LOG if set)
    #[clap(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Use the deterministic stub kernel instead of the HTTP transport
    #[clap(long)]
    stub_kernel: bool,
}

#[derive(Clone)]
struct AppState {
    gateway: Arc<Gateway>,
}

#[derive(Serialize)]
struct BioAuthResponse {
    success: bool,
    message: String,
    auth: AuthResult,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            cli.log_level
                .as_ref()
                .map(LogLevel::to_filter_directive)
                .unwrap_or("info"),
        )
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = BiocoreConfig::from_env().context("failed to load BioCore configuration")?;

    let transport: Box<dyn KernelTransport> = if cli.stub_kernel {
        info!("using stub trust kernel; no outbound Safe Core calls will be made");
        Box::new(StubKernelTransport)
    } else {
        Box::new(HttpKernelTransport::new(&config.kernel)?)
    };

    let engine = FingerprintEngine::new(config.pepper.clone());
    let bridge = TrustBridge::new(transport, config.kernel.app_id.clone());
    let state = AppState {
        gateway: Arc::new(Gateway::new(engine, bridge)),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/auth/bio", post(bio_auth))
        .layer(middleware::from_fn(audit_log))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cli.port))
        .await
        .with_context(|| format!("failed to bind to port {}", cli.port))?;

    info!(port = cli.port, "BioCore Nucle API listening; Safe Core bridge ready");

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}

/// Audit middleware: one line per inbound request.
async fn audit_log(request: Request, next: Next) -> Response {
    info!(
        target: "audit",
        method = %request.method(),
        path = %request.uri().path(),
        "request received"
    );
    next.run(request).await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "active", "module": "BioCore-Nucle" }))
}

async fn bio_auth(
    State(state): State<AppState>,
    Json(request): Json<BioAuthRequest>,
) -> Result<Json<BioAuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.gateway.authenticate(&request).await {
        Ok(auth) => Ok(Json(BioAuthResponse {
            success: true,
            message: "Biometric identity verified by Safe Core".to_string(),
            auth,
        })),
        Err(err) => Err(error_response(err)),
    }
}

/// Map pipeline failures to generic responses.
///
/// Bodies stay short and name no internal detail; the full error chain goes
/// to the log only.
fn error_response(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        AuthError::LivenessFailed => (
            StatusCode::FORBIDDEN,
            "Liveness check failed. Authentication aborted.",
        ),
        AuthError::InvalidInput(_) => (
            StatusCode::BAD_REQUEST,
            "Biometric data and user id are required.",
        ),
        AuthError::Bridge(BridgeError::KernelRejected { .. }) => (
            StatusCode::UNAUTHORIZED,
            "Authorization denied by Safe Core.",
        ),
        AuthError::Bridge(BridgeError::KernelUnreachable(_)) => {
            (StatusCode::BAD_GATEWAY, "Internal Security Error")
        }
    };
    error!("auth attempt failed: {err}");
    (status, Json(ErrorResponse { error: message.to_string() }))
}
