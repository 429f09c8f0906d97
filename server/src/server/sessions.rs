// The session registry: username -> live connection and current group.

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::Authenticator;
use crate::server::state::ConnId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A join was attempted for a username that never logged in.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Server-side record binding an authenticated username to its live
/// connection and current group. Both fields stay `None` between login and
/// the first `joinGroup`.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub conn: Option<ConnId>,
    pub group: Option<String>,
}

/// Username-keyed session store. One session per username; a later login
/// for the same name overwrites the previous record.
#[derive(Default)]
pub struct Sessions {
    map: HashMap<String, Session>,
}

impl Sessions {
    /// Delegate the credential check and, on success, create or reset the
    /// session with no connection and no group.
    pub fn authenticate(&mut self, auth: &Authenticator, username: &str, password: &str) -> bool {
        if !auth.check(username, password) {
            return false;
        }
        self.map.insert(username.to_string(), Session::default());
        true
    }

    pub fn is_authenticated(&self, username: &str) -> bool {
        self.map.contains_key(username)
    }

    /// Attach a live connection to an authenticated session.
    pub fn bind(&mut self, username: &str, conn: ConnId) -> Result<(), SessionError> {
        match self.map.get_mut(username) {
            Some(s) => {
                s.conn = Some(conn);
                Ok(())
            }
            None => Err(SessionError::NotAuthenticated),
        }
    }

    /// Record the session's current group. Callers bind first.
    pub fn set_group(&mut self, username: &str, group: &str) {
        if let Some(s) = self.map.get_mut(username) {
            s.group = Some(group.to_string());
        }
    }

    /// Remove every session bound to `conn`, returning the usernames and
    /// the groups they were last in so the caller can clean up membership
    /// and notify. Connection ids are unique per live connection, but
    /// uniqueness is not externally enforced, hence the full scan.
    pub fn unbind(&mut self, conn: ConnId) -> Vec<(String, Option<String>)> {
        let victims: Vec<String> = self
            .map
            .iter()
            .filter(|(_, s)| s.conn == Some(conn))
            .map(|(name, _)| name.clone())
            .collect();
        victims
            .into_iter()
            .filter_map(|name| self.map.remove(&name).map(|s| (name, s.group)))
            .collect()
    }

    pub fn get(&self, username: &str) -> Option<&Session> {
        self.map.get(username)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Session)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn auth() -> Authenticator {
        Authenticator::new(Config::default().users)
    }

    #[test]
    fn wrong_password_creates_no_session() {
        let mut sessions = Sessions::default();
        assert!(!sessions.authenticate(&auth(), "user1", "wrong"));
        assert!(!sessions.is_authenticated("user1"));
    }

    #[test]
    fn bind_requires_prior_login() {
        let mut sessions = Sessions::default();
        let conn = ConnId::next();
        assert_eq!(
            sessions.bind("user1", conn),
            Err(SessionError::NotAuthenticated)
        );

        assert!(sessions.authenticate(&auth(), "user1", "pass1"));
        assert_eq!(sessions.bind("user1", conn), Ok(()));
        assert_eq!(sessions.get("user1").unwrap().conn, Some(conn));
    }

    #[test]
    fn relogin_resets_connection_and_group() {
        let mut sessions = Sessions::default();
        let conn = ConnId::next();
        sessions.authenticate(&auth(), "user1", "pass1");
        sessions.bind("user1", conn).unwrap();
        sessions.set_group("user1", "lobby");

        // A later login for the same username overwrites the record.
        sessions.authenticate(&auth(), "user1", "pass1");
        let s = sessions.get("user1").unwrap();
        assert_eq!(s.conn, None);
        assert_eq!(s.group, None);
    }

    #[test]
    fn unbind_removes_matching_sessions_and_reports_groups() {
        let mut sessions = Sessions::default();
        let conn = ConnId::next();
        sessions.authenticate(&auth(), "user1", "pass1");
        sessions.bind("user1", conn).unwrap();
        sessions.set_group("user1", "lobby");

        let removed = sessions.unbind(conn);
        assert_eq!(removed, vec![("user1".to_string(), Some("lobby".into()))]);
        assert!(!sessions.is_authenticated("user1"));

        // A second unbind for the same id finds nothing.
        assert!(sessions.unbind(conn).is_empty());
    }

    #[test]
    fn unbind_of_unknown_connection_is_empty() {
        let mut sessions = Sessions::default();
        sessions.authenticate(&auth(), "user2", "pass2");
        assert!(sessions.unbind(ConnId::next()).is_empty());
        assert!(sessions.is_authenticated("user2"));
    }
}
