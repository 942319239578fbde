use axum::{routing::get, Router};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const HELLO_BODY: &str = "Hello, world";

/// GET `/{prefix}` answers [`HELLO_BODY`]; every other path is a 404.
pub fn hello_router(prefix: &str) -> Router {
    let path = format!("/{}", prefix.trim_start_matches('/'));
    Router::new().route(&path, get(|| async { HELLO_BODY }))
}

/// An axum app served on a background task until shut down or dropped.
pub struct TargetServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TargetServer {
    /// Serve `app` on an ephemeral loopback port.
    pub async fn start(app: Router) -> io::Result<Self> {
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)), app).await
    }

    pub async fn bind(addr: SocketAddr, app: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await;
            if let Err(e) = served {
                tracing::warn!("target server on {} stopped: {}", addr, e);
            }
        });

        tracing::debug!(%addr, "target server listening");
        Ok(Self {
            addr,
            shutdown: Some(shutdown),
            handle,
        })
    }

    /// Start the hello-world target under `prefix`.
    pub async fn hello(prefix: &str) -> io::Result<Self> {
        Self::start(hello_router(prefix)).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Absolute URL of `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for TargetServer {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.handle.abort();
        }
    }
}
