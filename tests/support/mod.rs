#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PATH_OK: &str = "/ok";
pub const PATH_TEAPOT: &str = "/teapot";
/// Every fifth request answers 503.
pub const PATH_FLAKY: &str = "/flaky";

pub struct TestServer {
    addr: SocketAddr,
    hits: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> anyhow::Result<Self> {
        let hits = Arc::new(AtomicU64::new(0));

        let ok_hits = hits.clone();
        let teapot_hits = hits.clone();
        let flaky_hits = hits.clone();
        let app = Router::new()
            .route(
                PATH_OK,
                get(move || {
                    let hits = ok_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .route(
                PATH_TEAPOT,
                get(move || {
                    let hits = teapot_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        StatusCode::IM_A_TEAPOT
                    }
                }),
            )
            .route(
                PATH_FLAKY,
                get(move || {
                    let hits = flaky_hits.clone();
                    async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst);
                        if n % 5 == 4 {
                            StatusCode::SERVICE_UNAVAILABLE
                        } else {
                            StatusCode::OK
                        }
                    }
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, hits, handle })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// URL on a port nothing listens on.
pub fn closed_port_url() -> anyhow::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/"))
}

/// Bare HTTP/1.1 server that keeps connections alive and counts how many
/// TCP connections it accepted.
pub struct KeepAliveServer {
    addr: SocketAddr,
    accepts: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl KeepAliveServer {
    pub async fn start(body_len: usize) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let accepts = Arc::new(AtomicU64::new(0));

        let mut response =
            format!("HTTP/1.1 200 OK\r\nContent-Length: {body_len}\r\n\r\n").into_bytes();
        response.resize(response.len() + body_len, b'x');
        let response = Arc::new(response);

        let counter = accepts.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let response = response.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut reader = BufReader::new(read);
                    let mut line = String::new();
                    loop {
                        // Request head ends at the first empty line; GETs carry no body.
                        let mut open = true;
                        loop {
                            line.clear();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => {
                                    open = false;
                                    break;
                                }
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => {}
                            }
                        }
                        if !open || write.write_all(&response).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Ok(Self {
            addr,
            accepts,
            handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn accepts(&self) -> u64 {
        self.accepts.load(Ordering::SeqCst)
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}
