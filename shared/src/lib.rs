//! Shared client/server protocol types for the group chat system.

pub mod messages;

pub use messages::{ClientMsg, LoginRequest, LoginResponse, ServerMsg, UploadResponse};
