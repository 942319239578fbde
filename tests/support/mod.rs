//! Mock targets for integration tests
//!
//! Every target is an in-process axum app on an ephemeral loopback port.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use hammer::header::{DEFAULT_HEADER_LEN, DEFAULT_HEADER_NAME};
use hammer::target::{TargetServer, HELLO_BODY};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

pub const PREFIX: &str = "abc";

/// Always 200 "Hello, world" on `/abc`
pub async fn hello_target() -> TargetServer {
    TargetServer::hello(PREFIX).await.unwrap()
}

/// Always 200 "Goodbye", on every path
pub async fn goodbye_target() -> TargetServer {
    TargetServer::start(Router::new().fallback(|| async { "Goodbye" }))
        .await
        .unwrap()
}

/// 404 on every path
pub async fn not_found_target() -> TargetServer {
    TargetServer::start(Router::new()).await.unwrap()
}

/// Hello only when the synthetic header arrived intact, 400 otherwise
pub async fn header_check_target() -> TargetServer {
    async fn check(headers: HeaderMap) -> (StatusCode, &'static str) {
        let name = DEFAULT_HEADER_NAME.to_ascii_lowercase();
        match headers.get(name.as_str()) {
            Some(value) if value.len() == DEFAULT_HEADER_LEN => (StatusCode::OK, HELLO_BODY),
            _ => (StatusCode::BAD_REQUEST, "header missing or truncated"),
        }
    }

    let app = Router::new().route(&format!("/{PREFIX}"), get(check));
    TargetServer::start(app).await.unwrap()
}

/// Rejects any header value longer than `limit` bytes with 431
pub async fn header_limit_target(limit: usize) -> TargetServer {
    let app = Router::new().route(
        &format!("/{PREFIX}"),
        get(move |headers: HeaderMap| async move {
            if headers.values().any(|v| v.len() > limit) {
                (StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE, "")
            } else {
                (StatusCode::OK, HELLO_BODY)
            }
        }),
    );
    TargetServer::start(app).await.unwrap()
}

/// Cycles hello / 404 / 500 by arrival order
pub async fn rotating_target() -> TargetServer {
    async fn rotate(State(hits): State<Arc<AtomicU64>>) -> (StatusCode, &'static str) {
        match hits.fetch_add(1, Ordering::SeqCst) % 3 {
            0 => (StatusCode::OK, HELLO_BODY),
            1 => (StatusCode::NOT_FOUND, "missing"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        }
    }

    let app = Router::new()
        .route(&format!("/{PREFIX}"), get(rotate))
        .with_state(Arc::new(AtomicU64::new(0)));
    TargetServer::start(app).await.unwrap()
}

/// URL on a loopback port nothing listens on
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/{PREFIX}")
}

/// HTTPS target with a freshly generated self-signed certificate.
///
/// Axum has no TLS listener, so this answers each connection by hand with a
/// single 200 "Hello, world" and closes it.
pub struct SelfSignedTarget {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SelfSignedTarget {
    pub async fn start() -> Self {
        let cert = rcgen::generate_simple_self_signed(vec![
            "localhost".to_string(),
            "127.0.0.1".to_string(),
        ])
        .unwrap();
        let cert_der = cert.cert.der().clone();
        let key_der =
            rustls::pki_types::PrivateKeyDer::try_from(cert.key_pair.serialize_der()).unwrap();

        let mut config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![cert_der], key_der)
        .unwrap();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    // Verifying clients abort the handshake; nothing to answer
                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };

                    let mut head = Vec::new();
                    let mut buf = [0u8; 4096];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match tls.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        HELLO_BODY.len(),
                        HELLO_BODY
                    );
                    let _ = tls.write_all(response.as_bytes()).await;
                    let _ = tls.shutdown().await;
                });
            }
        });

        Self { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("https://127.0.0.1:{}/{PREFIX}", self.addr.port())
    }
}

impl Drop for SelfSignedTarget {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
