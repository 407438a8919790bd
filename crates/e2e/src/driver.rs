//! WebDriver server management - spawning and health checking a local driver

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Handle to a running WebDriver server process
pub struct DriverHandle {
    child: Child,
    pub url: String,
    pub port: u16,
}

impl DriverHandle {
    /// Spawn a driver binary such as `chromedriver` or `geckodriver`
    pub async fn spawn(config: DriverConfig) -> E2eResult<Self> {
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let url = format!("http://127.0.0.1:{}", port);

        info!("Spawning {} on port {}", config.binary_path.display(), port);

        let child = Command::new(&config.binary_path)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                E2eError::DriverStartup(format!(
                    "Failed to spawn {}: {}",
                    config.binary_path.display(),
                    e
                ))
            })?;

        let handle = DriverHandle { child, url, port };

        wait_for_ready(&handle.url, Duration::from_secs(config.startup_timeout_secs)).await?;

        info!("WebDriver is ready at {}", handle.url);
        Ok(handle)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop the driver process
    pub fn stop(&mut self) -> E2eResult<()> {
        info!("Stopping WebDriver (pid: {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(200));
            }
        }

        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Poll the W3C `/status` endpoint at `url` until the driver reports ready
pub async fn wait_for_ready(url: &str, timeout_duration: Duration) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = std::time::Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout_duration {
        attempts += 1;

        match driver_ready(&client, url).await {
            Ok(true) => return Ok(()),
            Ok(false) => {
                if attempts == 1 {
                    info!("Waiting for WebDriver to report ready...");
                }
            }
            Err(e) => {
                // Connection refused is expected while the driver is starting
                if !e.is_connect() {
                    warn!("WebDriver status check error: {}", e);
                }
            }
        }

        sleep(Duration::from_millis(100)).await;
    }

    Err(E2eError::DriverHealthCheck(attempts))
}

/// Query `GET <url>/status` and return the `value.ready` flag
pub async fn driver_ready(client: &reqwest::Client, url: &str) -> Result<bool, reqwest::Error> {
    let status_url = format!("{}/status", url.trim_end_matches('/'));
    let resp = client.get(&status_url).send().await?;
    if !resp.status().is_success() {
        return Ok(false);
    }
    let body: serde_json::Value = resp.json().await?;
    Ok(body["value"]["ready"].as_bool().unwrap_or(false))
}

/// Check whether the application under test answers at `base_url`.
///
/// Informational only: the outcome is logged and returned, never raised.
pub async fn probe_target(base_url: &str) -> bool {
    let client = match reqwest::Client::builder().timeout(Duration::from_secs(5)).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build HTTP client for target probe: {}", e);
            return false;
        }
    };

    match client.get(base_url).send().await {
        Ok(resp) if resp.status().is_success() => {
            info!("Target {} is reachable ({})", base_url, resp.status());
            true
        }
        Ok(resp) => {
            warn!("Target {} answered {}", base_url, resp.status());
            false
        }
        Err(e) => {
            warn!("Target {} is not reachable: {}", base_url, e);
            false
        }
    }
}

/// Configuration for spawning a local WebDriver server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Path to the driver binary
    pub binary_path: PathBuf,

    /// Port to listen on (None = find free port)
    pub port: Option<u16>,

    /// Timeout for driver startup
    pub startup_timeout_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("chromedriver"),
            port: None,
            startup_timeout_secs: 30,
        }
    }
}

/// Find a free port to use
fn find_free_port() -> E2eResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
