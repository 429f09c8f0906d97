// Shared server state: the session registry, group directory and live
// connection senders behind a single lock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

use crate::auth::Authenticator;
use crate::blobstore::BlobStore;
use crate::config::Config;
use crate::server::groups::Groups;
use crate::server::sessions::Sessions;
use groupchat_shared::ServerMsg;

/// Opaque handle for one live client connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    /// Mint a fresh process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ConnId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the router mutates. Guarded by one lock so a whole router
/// step is a single critical section and the registry and directory can
/// never be observed out of step.
#[derive(Default)]
pub struct Hub {
    pub(crate) sessions: Sessions,
    pub(crate) groups: Groups,
    /// Outbound queue per live connection; fan-out is a local send here.
    pub(crate) conns: HashMap<ConnId, UnboundedSender<ServerMsg>>,
}

/// Shared application state exposed to handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) hub: Arc<RwLock<Hub>>,
    pub auth: Authenticator,
    pub store: BlobStore,
    /// Directory the static login/chat pages are served from.
    pub public_dir: PathBuf,
    /// In-memory shared Config instance. Holds the authoritative
    /// configuration for the running server.
    pub config: Arc<RwLock<Config>>,
    /// Optional path to the TOML config file used by the running server.
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Create a new AppState with the given config and optional config path
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let auth = Authenticator::new(config.users.clone());
        let store = BlobStore::new(config.upload_dir.clone());
        let public_dir = config.public_dir.clone();
        Self {
            hub: Arc::new(RwLock::new(Hub::default())),
            auth,
            store,
            public_dir,
            config: Arc::new(RwLock::new(config)),
            config_path,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), None)
    }
}
