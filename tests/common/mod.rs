use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// Names the PostgreSQL database the spawned server should use. The rest of
/// the connection (`DATABASE_HOST`, `DATABASE_USERNAME`, ...) is inherited
/// from the environment. When unset, end-to-end tests are skipped.
pub const E2E_DATABASE_ENV: &str = "CLASSIFIEDS_E2E_DATABASE";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(database: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_classifieds-api"));
        cmd.arg("serve")
            .env("SERVER_HOST", "127.0.0.1")
            .env("SERVER_PORT", port.to_string())
            .env("DATABASE_NAME", database)
            .env("JWT_KEY", "e2e-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start the shared server once per test binary. Returns `None` when no
/// end-to-end database is configured.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let Ok(database) = std::env::var(E2E_DATABASE_ENV) else {
        eprintln!("{E2E_DATABASE_ENV} not set, skipping end-to-end test");
        return Ok(None);
    };

    let server = SERVER.get_or_init(|| TestServer::spawn(&database).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(server))
}

/// A login that no earlier run has registered.
pub fn unique_login(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}_{nanos}")
}
