// HTTP handlers for the group chat server API.
//
// Login and upload sit outside the websocket event path: login populates the
// session registry that `joinGroup` later checks, and upload hands bytes to
// the blob store whose returned path flows back in via `sendFile`.

use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::state::AppState;
use groupchat_shared::{LoginRequest, LoginResponse, UploadResponse};

/// Validate credentials against the configured user list and create (or
/// reset) the username's session.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let mut hub = state.hub.write().await;
    if hub
        .sessions
        .authenticate(&state.auth, &req.username, &req.password)
    {
        tracing::info!(username = %req.username, "login successful");
        (
            StatusCode::OK,
            Json(LoginResponse {
                message: "Login successful".into(),
                username: Some(req.username),
            }),
        )
    } else {
        tracing::warn!(username = %req.username, "invalid credentials");
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                message: "Invalid credentials".into(),
                username: None,
            }),
        )
    }
}

/// Accept one multipart `file` field, hand the bytes to the blob store and
/// return the stored path for a later `sendFile` event.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let original = field.file_name().unwrap_or("upload").to_string();
        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read multipart field");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(UploadResponse {
                        message: "No file uploaded".into(),
                        file_path: None,
                    }),
                );
            }
        };
        return match state.store.store(&original, &bytes).await {
            Ok(path) => (
                StatusCode::OK,
                Json(UploadResponse {
                    message: "File uploaded successfully".into(),
                    file_path: Some(path),
                }),
            ),
            Err(e) => {
                tracing::error!(error = %e, "storing upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(UploadResponse {
                        message: "Upload failed".into(),
                        file_path: None,
                    }),
                )
            }
        };
    }

    (
        StatusCode::BAD_REQUEST,
        Json(UploadResponse {
            message: "No file uploaded".into(),
            file_path: None,
        }),
    )
}
