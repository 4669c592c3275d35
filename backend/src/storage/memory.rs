use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{StateKey, Storage};
use crate::error::{AppError, AppResult};

/// In-memory storage, used by tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<StateKey, String>>,
    quarantined: Mutex<HashMap<StateKey, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail until switched off again
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Document moved aside by [`Storage::quarantine`]
    pub fn quarantined(&self, key: StateKey) -> Option<String> {
        self.quarantined
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: StateKey) -> AppResult<Option<String>> {
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned())
    }

    fn write(&self, key: StateKey, contents: &str) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!(
                "write to {} rejected",
                key.file_name()
            )));
        }
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, contents.to_string());
        Ok(())
    }

    fn remove(&self, key: StateKey) -> AppResult<()> {
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);
        Ok(())
    }

    fn quarantine(&self, key: StateKey) -> AppResult<()> {
        let removed = self
            .documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);
        if let Some(contents) = removed {
            self.quarantined
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(key, contents);
        }
        Ok(())
    }
}
