#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use internal_sea_core::auth::JwtAuthenticator;
use internal_sea_core::config::SecurityConfig;
use reqwest::StatusCode;

pub const SECRET_KEY: &str = "test-secret-key-for-testing-only";
pub const BIN: &str = env!("CARGO_BIN_EXE_internal-sea-core");

/// A server process on its own port with a fresh in-memory store.
/// Killed when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(BIN)
            .args(["serve", "--store", "memory", "--port", &port.to_string()])
            .env("ENVIRONMENT", "development")
            .env("SECRET_KEY", SECRET_KEY)
            .env("ALGORITHM", "HS256")
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Bearer token the spawned server will accept for `user_id`.
pub fn token_for(user_id: i64) -> String {
    let authenticator = JwtAuthenticator::new(&SecurityConfig {
        secret_key: SECRET_KEY.to_string(),
        algorithm: "HS256".to_string(),
        access_token_expire_minutes: 30,
    })
    .expect("test security config is valid");
    authenticator.issue(user_id).expect("token signs")
}

/// Client that sends `Authorization: Bearer <token>` on every request.
pub fn authed_client(user_id: i64) -> reqwest::Client {
    let mut headers = reqwest::header::HeaderMap::new();
    let value = format!("Bearer {}", token_for(user_id));
    headers.insert(
        reqwest::header::AUTHORIZATION,
        value.parse().expect("valid header value"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("client builds")
}
