//! Integration tests for ChefEmCasa.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chef-em-casa-integration-tests
//! ```
//!
//! No external services are needed: [`TestServer`] runs the real router on
//! an ephemeral loopback port over a temporary data file.
//!
//! # Test Categories
//!
//! - `backend_contract` - the same suite against the local and remote backends
//! - `api` - HTTP status codes, headers and bodies
//! - `scenarios` - end-to-end flows through the client `App`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use chef_em_casa_app::{Backend, KeyValueStore, LocalBackend, MemoryStorage, RemoteBackend};
use chef_em_casa_server::{AppState, ServerConfig, build_router};
use tempfile::TempDir;

/// A running server over a temporary data file. Stops when the runtime does.
pub struct TestServer {
    pub base_url: String,
    pub data_file: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    /// Start a server seeded with the starter catalog.
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("database.json");
        let state = AppState::new(ServerConfig::local(&data_file)).await.unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, build_router(state)).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            data_file,
            _dir: dir,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A remote backend pointed at this server.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::new(RemoteBackend::new(&self.base_url).unwrap())
    }
}

/// A local backend over fresh in-memory storage.
#[must_use]
pub fn local_backend() -> (Arc<dyn Backend>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let as_store: Arc<dyn KeyValueStore> = storage.clone();
    (Arc::new(LocalBackend::new(as_store)), storage)
}
