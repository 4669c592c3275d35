//! Persistence of application state as independent JSON documents
//!
//! Each [`StateKey`] is read once at startup and rewritten in full whenever
//! its value changes. Backends only move raw JSON text; (de)serialization and
//! recovery from malformed documents happen here.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::AppResult;

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Independently persisted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Clients,
    Certificates,
    Settings,
    CertCounter,
    Session,
}

impl StateKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            StateKey::Clients => "clients.json",
            StateKey::Certificates => "certificates.json",
            StateKey::Settings => "settings.json",
            StateKey::CertCounter => "cert_counter.json",
            StateKey::Session => "session.json",
        }
    }
}

/// Storage backend trait
pub trait Storage: Send + Sync {
    /// Raw document, `None` when it was never written
    fn read(&self, key: StateKey) -> AppResult<Option<String>>;

    /// Replace the document
    fn write(&self, key: StateKey, contents: &str) -> AppResult<()>;

    /// Delete the document; missing documents are not an error
    fn remove(&self, key: StateKey) -> AppResult<()>;

    /// Move an unreadable document out of the way so it is not overwritten
    fn quarantine(&self, key: StateKey) -> AppResult<()>;
}

/// Outcome of loading a typed document
#[derive(Debug)]
pub enum Loaded<T> {
    Found(T),
    Missing,
    /// Present but unparseable; already quarantined
    Corrupt,
}

impl<T> Loaded<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Loaded::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Read and parse a document, quarantining it when it does not parse
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: StateKey) -> AppResult<Loaded<T>> {
    let Some(raw) = storage.read(key)? else {
        debug!(file = key.file_name(), "No stored state");
        return Ok(Loaded::Missing);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Loaded::Found(value)),
        Err(e) => {
            warn!(
                file = key.file_name(),
                error = %e,
                "Stored state is malformed; moving it aside and using defaults"
            );
            storage.quarantine(key)?;
            Ok(Loaded::Corrupt)
        }
    }
}

/// Serialize and write a document
pub fn save<T: Serialize + ?Sized>(storage: &dyn Storage, key: StateKey, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    storage.write(key, &json)
}
