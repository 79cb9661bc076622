//! In-memory store backing the reference server
//!
//! HashMap wrapped in a parking_lot RwLock: many concurrent readers, one
//! writer at a time.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::protocol::{Command, Reply};

/// Thread-safe key-value map
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key (read lock)
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    /// Insert or overwrite a key (write lock)
    pub fn set(&self, key: Vec<u8>, value: Vec<u8>) {
        self.data.write().insert(key, value);
    }

    /// Remove a key, returning whether it existed (write lock)
    pub fn del(&self, key: &[u8]) -> bool {
        self.data.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Execute a command and build its reply
    ///
    /// A missing key reads as an empty value, which clients count as a miss.
    pub fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Get { key } => Reply::Value(self.get(&key).unwrap_or_default()),
            Command::Set { key, value } => {
                self.set(key, value);
                Reply::empty()
            }
            Command::Del { key } => {
                self.del(&key);
                Reply::empty()
            }
        }
    }
}
