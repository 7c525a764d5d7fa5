use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{CredentialStore, FileStore, Session};
use crate::http::{ApiClient, ClientOptions};
use crate::runtime::Runtime;

/// Production API origin with the versioned prefix.
pub const DEFAULT_API_URL: &str = "https://api.ecovia.app/api/v1";

/// Wired-up client and session sharing one credential store.
pub struct Config {
    pub api: ApiClient,
    pub session: Session,
}

impl Config {
    pub fn new<R: Runtime + 'static>(
        runtime: R,
        api_url: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let base_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir(&runtime)?,
        };
        debug!("Using data directory: {:?}", dir);

        let store: Arc<dyn CredentialStore> =
            Arc::new(FileStore::new(runtime, dir.join("credentials.json")));

        let api = ApiClient::new(base_url.as_str(), store.clone(), ClientOptions::default())?;
        let session = Session::new(api.inner().clone(), base_url.as_str(), store);

        Ok(Self { api, session })
    }
}

/// Resolves where credentials live: `ECOVIA_HOME` when set, `~/.ecovia`
/// otherwise.
pub fn default_data_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if let Ok(dir) = runtime.env_var("ECOVIA_HOME") {
        return Ok(PathBuf::from(dir));
    }
    runtime
        .home_dir()
        .map(|home| home.join(".ecovia"))
        .context("Could not determine home directory")
}
