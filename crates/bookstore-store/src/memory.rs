use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use bookstore_types::domain::connection::{ConnectionState, StateCell};
use bookstore_types::ports::store::{StoreConnection, StoreError};

/// Scripted stand-in for the real database connection. Tests use it to
/// simulate handshake success or failure without a network, and to assert
/// that the bootstrap makes exactly one connection attempt.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: StateCell,
    fail_handshake: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: StateCell::new(),
            fail_handshake: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A handle whose handshake always fails.
    pub fn failing() -> Self {
        let store = Self::new();
        store.fail_handshake.store(true, Ordering::SeqCst);
        store
    }

    /// Number of `establish` calls made against this handle.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreConnection for MemoryStore {
    async fn establish(&self) -> Result<(), StoreError> {
        if !self.state.begin_establish() {
            return Err(StoreError::AlreadyEstablished);
        }
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_handshake.load(Ordering::SeqCst) {
            self.state.transition(ConnectionState::Errored)?;
            return Err(StoreError::ConnectionFailed(
                "simulated handshake failure".into(),
            ));
        }
        self.state.transition(ConnectionState::Connected)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self.state.get() {
            ConnectionState::Connected => Ok(()),
            other => Err(StoreError::NotConnected(other)),
        }
    }

    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn close(&self) {
        let _ = self.state.transition(ConnectionState::Closed);
    }
}
