//! Persisted key-value storage for the credential pair.
//!
//! The store holds opaque string values keyed by [`keys`]. Writers are
//! login, registration and a successful refresh; every outgoing request
//! reads. Last-write-wins, no locking discipline beyond the file write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::runtime::Runtime;

/// Well-known storage keys.
pub mod keys {
    /// Short-lived bearer credential sent with each authenticated request.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Longer-lived credential used solely to obtain a new access token.
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Serialized profile of the signed-in user.
    pub const USER_PROFILE: &str = "user_profile";
}

/// Async key-value store for credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// Credential store backed by a JSON file under the data directory.
pub struct FileStore<R> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> FileStore<R> {
    pub fn new(runtime: R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.runtime.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let content = self.runtime.read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse credential file at {:?}", self.path))
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            self.runtime.create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(values).context("Failed to serialize credentials")?;
        self.runtime.write(&self.path, content.as_bytes())
    }
}

#[async_trait]
impl<R: Runtime> CredentialStore for FileStore<R> {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    #[tracing::instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, keys: &[&str]) -> Result<()> {
        if !self.runtime.exists(&self.path) {
            return Ok(());
        }
        let mut values = self.load()?;
        for key in keys {
            values.remove(*key);
        }
        self.save(&values)
    }
}

/// In-memory credential store for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut values = self.values.write().await;
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
