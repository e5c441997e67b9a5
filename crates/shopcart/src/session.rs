//! # Session Store
//!
//! The cart never keeps items in memory between calls: every operation reads
//! the cart from the host session and mutating operations write it back.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartManager::add(item)                                                 │
//! │       │                                                                 │
//! │       ├── session.get("shopcart.default")  → Option<Value>              │
//! │       │        None ⇒ empty cart                                        │
//! │       ├── cart.put(item)                                                │
//! │       └── session.put("shopcart.default", cart as JSON object)          │
//! │                                                                         │
//! │  CartManager::forget()                                                  │
//! │       └── session.forget("shopcart.default")                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent requests on one session race last-write-wins on the whole
//! cart. Serializing those requests is the host session store's job.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::SessionResult;

/// Key-value session storage supplied by the host framework.
pub trait SessionStore {
    /// Reads the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> SessionResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: Value) -> SessionResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn forget(&mut self, key: &str) -> SessionResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get(&self, key: &str) -> SessionResult<Option<Value>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> SessionResult<()> {
        (**self).put(key, value)
    }

    fn forget(&mut self, key: &str) -> SessionResult<()> {
        (**self).forget(key)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> SessionResult<Option<Value>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> SessionResult<()> {
        (**self).put(key, value)
    }

    fn forget(&mut self, key: &str) -> SessionResult<()> {
        (**self).forget(key)
    }
}

/// In-process session, for tests and single-process hosts.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, Value>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> SessionResult<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> SessionResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn forget(&mut self, key: &str) -> SessionResult<()> {
        self.values.remove(key);
        Ok(())
    }
}
