//! Azure DevOps Tools Server
//!
//! HTTP host exposing the work item attachment tools to an agent framework:
//! tool discovery on `GET /tools`, invocation on `POST /tools/{name}`. Tool
//! failures are part of the result text, never HTTP error codes.

use std::fs::OpenOptions;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ado_client::{RestWorkItemClient, WorkItemClient};
use ado_core::AppConfig;
use ado_tools::{AttachmentTools, ToolDefinition, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    init_tracing(config.logging.file.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        organization = %config.connection.organization_url,
        project = %config.connection.project,
        host = %config.server.host,
        port = config.server.port,
        "Starting Azure DevOps tools server"
    );

    if config.connection.personal_access_token.is_empty() {
        warn!("AZURE_DEVOPS_PAT is not set; calls to Azure DevOps will be rejected");
    }

    let client = Arc::new(RestWorkItemClient::new(&config.connection)?);
    let registry = Arc::new(ToolRegistry::new(AttachmentTools::new(
        client,
        config.directories.clone(),
    )));

    let app = build_router(registry);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing: stderr layer plus an append-mode file layer when a
/// log file is configured.
fn init_tracing(log_file: Option<&FsPath>) {
    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,ado_server=debug,ado_tools=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true));

    let file = log_file.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
            .init(),
        None => registry.init(),
    }
}

/// Build the application router
fn build_router<C: WorkItemClient + 'static>(registry: Arc<ToolRegistry<C>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools::<C>))
        .route("/tools/:name", post(call_tool::<C>))
        .with_state(registry)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_tools<C: WorkItemClient>(
    State(registry): State<Arc<ToolRegistry<C>>>,
) -> Json<Vec<ToolDefinition>> {
    Json(registry.definitions())
}

async fn call_tool<C: WorkItemClient>(
    State(registry): State<Arc<ToolRegistry<C>>>,
    Path(name): Path<String>,
    Json(arguments): Json<serde_json::Value>,
) -> String {
    registry.call(&name, arguments).await
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
