use axum::Router;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::inbound::http::build_router;
use bookstore_types::ports::store::{StoreConnection, StoreError};

/// Everything one running service instance owns: the assembled router, the
/// database connection handle and the listen address. Built once and passed
/// explicitly; there is no process-wide singleton.
pub struct ServiceContext<S: StoreConnection> {
    router: Router,
    store: Arc<S>,
    addr: SocketAddr,
}

impl<S: StoreConnection> ServiceContext<S> {
    /// Construct-only mode: build the application without binding a socket
    /// or initiating the database handshake.
    pub fn new(config: &Config, store: S, api: Router<Arc<S>>) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let covers_dir = PathBuf::from(&config.covers_dir);
        let router = build_router(store.clone(), &covers_dir, api);
        let addr = format!("0.0.0.0:{}", config.server_port).parse()?;
        Ok(Self {
            router,
            store,
            addr,
        })
    }

    /// The assembled application, for embedding or reuse without starting
    /// a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> Arc<S> {
        self.store.clone()
    }

    /// Construct-and-start mode: bind the listener, kick off the connection
    /// handshake in the background and serve until either the server stops
    /// or the handshake reports an error.
    ///
    /// A handshake error is fatal by policy. It is returned to the caller
    /// rather than terminating the process here, so the exit decision stays
    /// in one place (the binary maps it to status 1) and the policy is
    /// testable in-process. No retry, no reconnection.
    pub async fn run(self) -> anyhow::Result<()> {
        let (errors_tx, mut errors_rx) = mpsc::channel::<StoreError>(1);
        tokio::spawn(supervise_connection(self.store.clone(), errors_tx));

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", listener.local_addr()?);

        let mut serve =
            std::pin::pin!(axum::serve(listener, self.router.into_make_service()).into_future());
        tokio::select! {
            res = &mut serve => res?,
            // The branch is disabled once the sender drops without sending,
            // i.e. after a successful handshake.
            Some(err) = errors_rx.recv() => {
                anyhow::bail!("database connection error: {err}");
            }
        }
        Ok(())
    }
}

/// Lifecycle observer for the connection handle. Success is logged and the
/// error channel closes untouched; failure is logged and forwarded so the
/// run loop can apply the fail-fast policy.
async fn supervise_connection<S: StoreConnection>(store: Arc<S>, errors: mpsc::Sender<StoreError>) {
    match store.establish().await {
        Ok(()) => tracing::info!("Connected to the database successfully"),
        Err(err) => {
            tracing::error!(error = %err, "database connection failed");
            let _ = errors.send(err).await;
        }
    }
}
