// Run and routing helpers (build_router, run_server, page handlers).

use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;

use crate::server::AppState;
use anyhow::{Context, Result};

pub fn build_router(state: AppState) -> Router {
    // Static assets are nested under /public; the entry pages get explicit
    // routes so the login flow lands on them directly.
    let serve_public = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "ok": true })) }),
        )
        // WebSocket endpoint carrying the joinGroup/sendMessage/sendFile events
        .route("/ws", get(crate::server::ws::ws_handler))
        .route("/login", post(crate::server::http::login_handler))
        .route("/upload", post(crate::server::http::upload_handler))
        .nest_service("/public", serve_public)
        // Login page first, chat page after a successful login
        .route("/", get(serve_login))
        .route("/chat", get(serve_chat))
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);

    let display_addr = if addr.ip().to_string() == "127.0.0.1" {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    };

    tracing::info!(display_addr = %display_addr, "group chat server running");

    // Nice clickable banner for the chat UI
    println!("\n\x1b[1;36m=== Group Chat Available ===\x1b[0m");
    println!(
        "\x1b[1mURL:\x1b[0m       \x1b[4;34mhttp://{}\x1b[0m",
        display_addr
    );
    println!("\x1b[1;36m============================\x1b[0m\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", display_addr))?;
    // axum::serve runs until shutdown; propagate nothing on clean exit.
    let _ = axum::serve(listener, app).await;
    Ok(())
}

/// Serve the login page at `/`.
async fn serve_login(State(state): State<AppState>) -> impl IntoResponse {
    serve_page(&state.public_dir, "login.html").await
}

/// Serve the chat page shown after login.
async fn serve_chat(State(state): State<AppState>) -> impl IntoResponse {
    serve_page(&state.public_dir, "chat.html").await
}

async fn serve_page(dir: &Path, name: &str) -> axum::response::Response {
    match tokio::fs::read_to_string(dir.join(name)).await {
        Ok(content) => (
            axum::http::StatusCode::OK,
            [("content-type", "text/html")],
            content,
        )
            .into_response(),
        Err(_) => {
            (axum::http::StatusCode::NOT_FOUND, format!("{} not found", name)).into_response()
        }
    }
}
