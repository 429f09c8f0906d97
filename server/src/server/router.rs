// The broadcast router: applies client events against the session registry
// and group directory, then fans notifications out to the affected group's
// live connections.

use groupchat_shared::{ClientMsg, ServerMsg};

use crate::server::state::{AppState, ConnId, Hub};

/// Apply one client event. Every arm runs under a single write lock on the
/// hub, so the registry and the directory can never disagree mid-step.
pub async fn handle_client_msg(state: &AppState, conn: ConnId, msg: ClientMsg) {
    let mut hub = state.hub.write().await;
    match msg {
        ClientMsg::JoinGroup {
            username,
            group_name,
        } => join_group(&mut hub, conn, &username, &group_name),
        ClientMsg::SendMessage {
            username,
            group_name,
            message,
        } => broadcast(&hub, &group_name, format!("{}: {}", username, message)),
        ClientMsg::SendFile {
            username,
            group_name,
            file_path,
        } => broadcast(
            &hub,
            &group_name,
            format!("{} shared a file: {}", username, file_path),
        ),
    }
}

fn join_group(hub: &mut Hub, conn: ConnId, username: &str, group_name: &str) {
    // The only authorization check in the event path: the username must
    // have logged in at some point. The notice goes to the offending
    // connection alone.
    let prior = match hub.sessions.get(username) {
        Some(s) => (s.conn, s.group.clone()),
        None => {
            tracing::warn!(%conn, username, "join without login");
            send_to(
                hub,
                conn,
                ServerMsg::Message("You need to log in first.".into()),
            );
            return;
        }
    };

    // A rejoin from a new connection or into a different group must not
    // leave a stale membership behind: a connection lives in at most one
    // group, and only while a session points at it.
    if let (Some(old_conn), Some(old_group)) = prior {
        if old_conn != conn || old_group != group_name {
            hub.groups.leave(&old_group, old_conn);
        }
    }

    if hub.sessions.bind(username, conn).is_err() {
        // Unreachable past the lookup above; kept for the contract.
        return;
    }
    hub.sessions.set_group(username, group_name);
    hub.groups.join(group_name, conn);
    tracing::info!(%conn, username, group = group_name, "joined group");
    broadcast(
        hub,
        group_name,
        format!("{} has joined the group: {}", username, group_name),
    );
}

/// Tear down everything the connection owned. The websocket loop calls this
/// exactly once, on any exit path.
pub async fn handle_disconnect(state: &AppState, conn: ConnId) {
    let mut hub = state.hub.write().await;
    for (username, group) in hub.sessions.unbind(conn) {
        if let Some(group) = group {
            hub.groups.leave(&group, conn);
            tracing::info!(%conn, username = %username, group = %group, "left group");
            broadcast(
                &hub,
                &group,
                format!("{} has left the group: {}", username, group),
            );
        }
    }
    // Defensive sweep: memberships whose session was overwritten by a
    // later login have no username to announce, but must not linger.
    hub.groups.purge(conn);
    hub.conns.remove(&conn);
}

/// O(N) local sends to the group's current members. An unknown group has
/// zero recipients and the call is a no-op.
fn broadcast(hub: &Hub, group: &str, text: String) {
    for member in hub.groups.members(group) {
        send_to(hub, member, ServerMsg::Message(text.clone()));
    }
}

fn send_to(hub: &Hub, conn: ConnId, msg: ServerMsg) {
    if let Some(tx) = hub.conns.get(&conn) {
        // A closed channel just means the peer is mid-disconnect; its
        // cleanup will drop the sender shortly.
        let _ = tx.send(msg);
    }
}
