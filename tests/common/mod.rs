//! Shared utilities for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use cotacao::rates::{PersistedRateRecord, RateConnection, RateQuote, RateStore};
use cotacao::{RateError, RateResult, RateServer};

/// Upstream body for a USD/BRL quote with the given bid.
pub fn upstream_json(bid: &str) -> String {
    format!(
        r#"{{"USDBRL":{{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.4521","low":"5.4012","varBid":"0.0123","pctChange":"0.23","bid":"{}","ask":"5.4312","timestamp":"1717012345","create_date":"2024-05-29 17:12:25"}}}}"#,
        bid
    )
}

/// Client that never reuses connections across tests.
pub fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// `f` decides each response and may sleep to simulate a slow peer.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that always answers `status` with `body`, counting hits.
pub async fn start_counting_backend(status: u16, body: String, delay: Duration) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = start_programmable_backend(move || {
        let counter = counter.clone();
        let body = body.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            (status, body)
        }
    })
    .await;
    (addr, hits)
}

/// Start a backend that promises `content_length` bytes, sends only
/// `partial_body`, then holds the connection open for `stall`.
pub async fn start_stalling_backend(content_length: usize, partial_body: &'static str, stall: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    content_length
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(partial_body.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(stall).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Serve `server` on an ephemeral port, returning its `/cotacao` URL.
pub async fn spawn_server(server: RateServer) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    format!("http://{}/cotacao", addr)
}

/// Store double that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub connects: AtomicUsize,
    pub inserts: Arc<AtomicUsize>,
    pub fail_setup: bool,
    pub fail_insert: bool,
    pub insert_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn failing_setup() -> Self {
        Self {
            fail_setup: true,
            ..Default::default()
        }
    }

    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Default::default()
        }
    }

    pub fn slow_insert(delay: Duration) -> Self {
        Self {
            insert_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst) + self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateStore for RecordingStore {
    async fn connect(&self) -> RateResult<Box<dyn RateConnection>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_setup {
            return Err(RateError::PersistenceSetup("unable to open database file".into()));
        }
        Ok(Box::new(RecordingConnection {
            inserts: self.inserts.clone(),
            fail: self.fail_insert,
            delay: self.insert_delay,
        }))
    }
}

struct RecordingConnection {
    inserts: Arc<AtomicUsize>,
    fail: bool,
    delay: Option<Duration>,
}

#[async_trait]
impl RateConnection for RecordingConnection {
    async fn insert(&mut self, quote: &RateQuote) -> RateResult<PersistedRateRecord> {
        let id = self.inserts.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(RateError::PersistenceWrite("database is locked".into()));
        }
        Ok(PersistedRateRecord {
            id,
            quote: quote.clone(),
        })
    }
}
