use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use bookstore_types::domain::connection::{ConnectionState, StateCell};
use bookstore_types::ports::store::{StoreConnection, StoreError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection handle for the Atlas cluster. The client is created during
/// `establish` and verified with an admin `ping`; there is no retry, a
/// failed handshake leaves the handle in `Errored` for good.
#[derive(Debug)]
pub struct MongoStore {
    uri: String,
    state: StateCell,
    client: OnceLock<Client>,
}

impl MongoStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            state: StateCell::new(),
            client: OnceLock::new(),
        }
    }

    /// The database named in the connection URI, once established.
    pub fn database(&self) -> Option<Database> {
        self.client.get().and_then(|c| c.default_database())
    }

    async fn handshake(&self) -> Result<Client, StoreError> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        // The driver connects lazily; a ping forces the handshake now so
        // the lifecycle observers see a definitive outcome.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(client)
    }
}

#[async_trait]
impl StoreConnection for MongoStore {
    async fn establish(&self) -> Result<(), StoreError> {
        if !self.state.begin_establish() {
            return Err(StoreError::AlreadyEstablished);
        }
        debug!("opening database connection");
        match self.handshake().await {
            Ok(client) => {
                let _ = self.client.set(client);
                self.state.transition(ConnectionState::Connected)?;
                Ok(())
            }
            Err(err) => {
                self.state.transition(ConnectionState::Errored)?;
                Err(err)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let client = self
            .client
            .get()
            .ok_or(StoreError::NotConnected(self.state.get()))?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn close(&self) {
        let _ = self.state.transition(ConnectionState::Closed);
    }
}
