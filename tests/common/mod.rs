//! Shared utilities for integration testing.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, Uri};
use axum::{Json, Router};
use mybank_gateway::config::{GatewayConfig, RouteConfig, ServiceConfig};
use mybank_gateway::{GatewayServer, Shutdown};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

/// Start a downstream service that echoes what the gateway sent it.
#[allow(dead_code)]
pub async fn start_echo_service() -> SocketAddr {
    start_service(Duration::ZERO).await
}

/// Start a downstream service that answers only after `delay`.
#[allow(dead_code)]
pub async fn start_slow_service(delay: Duration) -> SocketAddr {
    start_service(delay).await
}

async fn start_service(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move |headers: HeaderMap, uri: Uri| async move {
        tokio::time::sleep(delay).await;
        let values = |name: &str| -> Vec<String> {
            headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(String::from)
                .collect()
        };
        Json(serde_json::json!({
            "correlationIds": values("mybank-correlation-id"),
            "path": uri.to_string(),
            "forwardedFor": values("x-forwarded-for"),
        }))
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Gateway config routing `/mybank/accounts` to the given instance.
#[allow(dead_code)]
pub fn gateway_config(accounts: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.services = vec![ServiceConfig {
        name: "ACCOUNTS".into(),
        instances: vec![accounts.to_string()],
        strategy: Default::default(),
    }];
    config.routes = vec![RouteConfig {
        id: "accounts".into(),
        host: None,
        path_prefix: "/mybank/accounts".into(),
        service: "accounts".into(),
        strip_prefix: true,
        priority: 0,
        timeout_ms: None,
    }];
    config
}

/// Start a gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never pools or proxies, so every test request is isolated.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Log sink capturing formatted tracing output in memory.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Subscriber writing into this sink, for `tracing::subscriber::set_default`.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
