//! Client-server messaging protocol for the group chat server.

use serde::{Deserialize, Serialize};

/// Messages that clients can send to the server over the websocket.
///
/// Encoded adjacently tagged with camelCase tags and field names, e.g.:
/// `{ "type": "joinGroup", "data": { "username": "user1", "groupName": "lobby" } }`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Join a group, creating it on first reference.
    #[serde(rename_all = "camelCase")]
    JoinGroup { username: String, group_name: String },
    /// Send a chat line to every member of the named group.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        username: String,
        group_name: String,
        message: String,
    },
    /// Announce a previously uploaded file to every member of the named group.
    /// `file_path` is the opaque path returned by `POST /upload`.
    #[serde(rename_all = "camelCase")]
    SendFile {
        username: String,
        group_name: String,
        file_path: String,
    },
}

/// Messages that the server can send to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Human-readable notice or chat line fanned out to group members.
    Message(String),
    /// Sent to a single connection when its payload could not be handled.
    Error(String),
}

/// Body of `POST /login`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /login`. `username` is present on success only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Response of `POST /upload`. `file_path` is present on success only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_msg_wire_format_is_camel_case() {
        let cm = ClientMsg::JoinGroup {
            username: "user1".into(),
            group_name: "lobby".into(),
        };
        let v = serde_json::to_value(&cm).unwrap();
        assert_eq!(v["type"], "joinGroup");
        assert_eq!(v["data"]["username"], "user1");
        assert_eq!(v["data"]["groupName"], "lobby");

        let cm = ClientMsg::SendFile {
            username: "user2".into(),
            group_name: "lobby".into(),
            file_path: "uploads/abc123".into(),
        };
        let v = serde_json::to_value(&cm).unwrap();
        assert_eq!(v["type"], "sendFile");
        assert_eq!(v["data"]["filePath"], "uploads/abc123");
    }

    #[test]
    fn client_msg_parses_wire_json() {
        let txt = r#"{"type":"sendMessage","data":{"username":"user1","groupName":"lobby","message":"hi"}}"#;
        let cm: ClientMsg = serde_json::from_str(txt).unwrap();
        match cm {
            ClientMsg::SendMessage {
                username,
                group_name,
                message,
            } => {
                assert_eq!(username, "user1");
                assert_eq!(group_name, "lobby");
                assert_eq!(message, "hi");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn server_msg_round_trips() {
        let sm = ServerMsg::Message("user1: hi".into());
        assert_eq!(serde_json::to_value(&sm).unwrap()["type"], "message");
        let txt = serde_json::to_string(&sm).unwrap();
        match serde_json::from_str::<ServerMsg>(&txt).unwrap() {
            ServerMsg::Message(s) => assert_eq!(s, "user1: hi"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn login_response_omits_absent_username() {
        let resp = LoginResponse {
            message: "Invalid credentials".into(),
            username: None,
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("username").is_none());
    }
}
