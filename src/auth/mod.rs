//! Credential storage and auth session operations.

mod session;
mod store;

pub use session::Session;
pub use store::{CredentialStore, FileStore, MemoryStore, keys};
