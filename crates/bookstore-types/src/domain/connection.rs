use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Lifecycle of the single database connection handle a process owns.
///
/// A handle starts in `Connecting`. The handshake either promotes it to
/// `Connected` or parks it in `Errored`; `Errored` is terminal because the
/// service treats a lost persistence layer as fatal. `Closed` is reached
/// only through an explicit close, never as part of error handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Errored,
    Closed,
}

impl ConnectionState {
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Connected)
                | (Connecting, Errored)
                | (Connecting, Closed)
                | (Connected, Closed)
        )
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Errored | ConnectionState::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Errored => "errored",
            ConnectionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid connection state transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

#[derive(Debug)]
struct CellInner {
    state: ConnectionState,
    handshake_claimed: bool,
}

/// Shared, checked holder for a handle's lifecycle state. Cloning shares
/// the underlying cell, so an adapter and its supervisor observe the same
/// state.
#[derive(Debug, Clone)]
pub struct StateCell(Arc<RwLock<CellInner>>);

impl StateCell {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(CellInner {
            state: ConnectionState::Connecting,
            handshake_claimed: false,
        })))
    }

    pub fn get(&self) -> ConnectionState {
        self.0.read().expect("connection state lock poisoned").state
    }

    /// Claim the one handshake this handle may ever run. The claim is
    /// taken under the write lock, so of any number of concurrent callers
    /// exactly one gets `true`; every later caller, and any caller once
    /// the cell has left `Connecting`, gets `false`.
    pub fn begin_establish(&self) -> bool {
        let mut guard = self.0.write().expect("connection state lock poisoned");
        if guard.state == ConnectionState::Connecting && !guard.handshake_claimed {
            guard.handshake_claimed = true;
            true
        } else {
            false
        }
    }

    pub fn transition(&self, to: ConnectionState) -> Result<(), InvalidTransition> {
        let mut guard = self.0.write().expect("connection state lock poisoned");
        if !guard.state.can_transition_to(to) {
            return Err(InvalidTransition {
                from: guard.state,
                to,
            });
        }
        guard.state = to;
        Ok(())
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
