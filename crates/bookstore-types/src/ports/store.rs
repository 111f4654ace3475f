use async_trait::async_trait;

use crate::domain::connection::{ConnectionState, InvalidTransition};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection already established")]
    AlreadyEstablished,

    #[error("store not connected (state: {0})")]
    NotConnected(ConnectionState),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

/// Outbound port for the document-database connection handle.
///
/// A process holds exactly one handle. `establish` runs the handshake once;
/// calling it again after the handle has left `Connecting` is an error.
/// There is no retry inside the port: connection failure is surfaced to the
/// caller, which applies the fail-fast policy.
#[async_trait]
pub trait StoreConnection: Send + Sync + 'static {
    /// Drive the connection handshake to completion.
    async fn establish(&self) -> Result<(), StoreError>;

    /// Cheap liveness probe; only valid once established.
    async fn ping(&self) -> Result<(), StoreError>;

    fn state(&self) -> ConnectionState;

    /// Mark the handle closed. Teardown beyond that is left to the driver.
    fn close(&self);
}
