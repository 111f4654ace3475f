#[cfg(not(any(feature = "memory", feature = "mongo")))]
compile_error!("Enable a store feature: `memory` or `mongo`.");

use async_trait::async_trait;
use bookstore_types::domain::connection::ConnectionState;
use bookstore_types::ports::store::{StoreConnection, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;

#[derive(Debug)]
pub struct Store {
    #[cfg(all(feature = "memory", not(feature = "mongo")))]
    memory: memory::MemoryStore,
    #[cfg(feature = "mongo")]
    mongo: mongo::MongoStore,
}

/// Build the connection handle for the enabled backend. Construction never
/// touches the network; the handshake is deferred to `establish`.
pub fn build_store(uri: Option<&str>) -> anyhow::Result<Store> {
    Store::build_store(uri)
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "mongo")))]
    pub fn build_store(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::MemoryStore::new(),
        })
    }

    // If both features are enabled, mongo is the system of record.
    #[cfg(feature = "mongo")]
    pub fn build_store(uri: Option<&str>) -> anyhow::Result<Self> {
        let uri = uri.ok_or_else(|| anyhow::anyhow!("mongo store requires a connection URI"))?;
        Ok(Self {
            mongo: mongo::MongoStore::new(uri),
        })
    }
}

#[cfg(all(feature = "memory", not(feature = "mongo")))]
#[async_trait]
impl StoreConnection for Store {
    async fn establish(&self) -> Result<(), StoreError> {
        self.memory.establish().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.memory.ping().await
    }

    fn state(&self) -> ConnectionState {
        self.memory.state()
    }

    fn close(&self) {
        self.memory.close()
    }
}

#[cfg(feature = "mongo")]
#[async_trait]
impl StoreConnection for Store {
    async fn establish(&self) -> Result<(), StoreError> {
        self.mongo.establish().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.mongo.ping().await
    }

    fn state(&self) -> ConnectionState {
        self.mongo.state()
    }

    fn close(&self) {
        self.mongo.close()
    }
}
