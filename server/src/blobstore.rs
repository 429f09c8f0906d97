//! On-disk blob store for file uploads.
//!
//! Uploaded bytes land under the configured directory with a random hex
//! name. The returned relative path is the opaque identifier clients later
//! announce via `sendFile`; the router never touches file bytes.

use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store one upload and return its relative path.
    ///
    /// The client-supplied filename is logged but never used for the on-disk
    /// name, so path components in it cannot escape the root.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload directory '{}'", self.root.display()))?;

        let name: [u8; 16] = rand::random();
        let dest = self.root.join(hex::encode(name));
        tokio::fs::write(&dest, bytes)
            .await
            .with_context(|| format!("writing upload to '{}'", dest.display()))?;

        tracing::info!(
            original = %original_name,
            stored = %dest.display(),
            size = bytes.len(),
            "stored upload"
        );
        Ok(dest.to_string_lossy().into_owned())
    }
}
