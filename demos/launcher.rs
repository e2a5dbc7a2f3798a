//! # Example: launcher
//!
//! Two units under one supervisor:
//! - `http`: a tiny TCP listener answering every connection with a hello page;
//! - `ticker`: logs a heartbeat every second.
//!
//! Press Ctrl-C (or send SIGTERM/SIGQUIT): `ticker` is asked to stop first, then
//! `http`, both with the same 5s deadline.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example launcher
//! curl http://127.0.0.1:8080/
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use unitvisor::{Config, Deadline, LogWriter, Supervisor, Unit, UnitError, UnitFn};

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 21\r\nConnection: close\r\n\r\n<h1>Hello world!</h1>";

struct HelloServer {
    addr: &'static str,
    stop: CancellationToken,
}

#[async_trait]
impl Unit for HelloServer {
    fn id(&self) -> &str {
        "http"
    }

    async fn run(&self) -> Result<(), UnitError> {
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!(addr = self.addr, "listening");

        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return Ok(()),
                accepted = listener.accept() => {
                    let (mut sock, _) = accepted?;
                    tokio::spawn(async move {
                        let _ = sock.write_all(RESPONSE).await;
                        let _ = sock.shutdown().await;
                    });
                }
            }
        }
    }

    async fn shutdown(&self, deadline: Deadline) -> Result<(), UnitError> {
        tracing::info!(remaining = ?deadline.remaining(), "closing listener");
        self.stop.cancel();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let sup = Supervisor::builder(Config::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();
    sup.set_shutdown_timeout(Duration::from_secs(5));

    sup.add(Arc::new(HelloServer {
        addr: "127.0.0.1:8080",
        stop: CancellationToken::new(),
    }))?;
    sup.add(UnitFn::arc("ticker", |ctx: CancellationToken| async move {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = tick.tick() => tracing::info!("tick"),
            }
        }
    }))?;

    sup.run().await?;
    Ok(())
}
