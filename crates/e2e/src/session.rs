//! Browser session lifecycle
//!
//! Each test case gets one exclusive WebDriver session. Setup creates it and
//! applies the implicit wait; teardown captures a screenshot and quits, and
//! neither step can fail the case it brackets.

use std::path::PathBuf;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thirtyfour::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::page::{AddressBookPage, WebDriverPage};
use crate::screenshot::{ScreenshotRecord, ScreenshotStore};
use crate::selectors::PageSelectors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            other => Err(E2eError::Config(format!("unsupported browser: {}", other))),
        }
    }
}

/// Configuration for WebDriver sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// WebDriver server URL
    pub webdriver_url: String,

    pub browser: Browser,
    pub headless: bool,

    /// Session-wide implicit wait for element lookups
    pub implicit_wait_secs: u64,

    pub window_width: u32,
    pub window_height: u32,

    /// Directory for teardown screenshots
    pub screenshot_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            browser: Browser::Chrome,
            headless: true,
            implicit_wait_secs: 10,
            window_width: 1280,
            window_height: 720,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

impl SessionConfig {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }
}

/// What teardown managed to do
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    pub screenshot: Option<ScreenshotRecord>,

    /// Set when quitting the session failed
    pub quit_error: Option<String>,
}

/// Creates and disposes of the per-case sessions a runner uses
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: AddressBookPage;

    /// Set up a fresh session
    async fn open(&self) -> E2eResult<Self::Session>;

    /// Tear down a session. Must not fail.
    async fn close(&self, session: Self::Session) -> TeardownReport;
}

/// [`SessionFactory`] producing live WebDriver sessions
pub struct WebDriverSessions {
    config: SessionConfig,
    selectors: PageSelectors,
    base_url: String,
    screenshots: ScreenshotStore,
}

impl WebDriverSessions {
    pub fn new(
        config: SessionConfig,
        selectors: PageSelectors,
        base_url: impl Into<String>,
    ) -> Self {
        let screenshots = ScreenshotStore::new(config.screenshot_dir.clone());
        Self {
            config,
            selectors,
            base_url: base_url.into(),
            screenshots,
        }
    }

    async fn connect(&self) -> E2eResult<WebDriver> {
        let url = self.config.webdriver_url.as_str();
        let driver = match self.config.browser {
            Browser::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(url, caps).await
            }
            Browser::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if self.config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(url, caps).await
            }
        };

        driver.map_err(|e| {
            E2eError::SessionStartup(format!(
                "{} session at {}: {}",
                self.config.browser.as_str(),
                url,
                e
            ))
        })
    }
}

#[async_trait]
impl SessionFactory for WebDriverSessions {
    type Session = WebDriverPage;

    async fn open(&self) -> E2eResult<WebDriverPage> {
        let driver = self.connect().await?;
        debug!("Opened {} session", self.config.browser.as_str());

        if let Err(e) = configure(&driver, &self.config).await {
            // Don't leak the browser when setup fails halfway
            let _ = driver.quit().await;
            return Err(e);
        }

        self.screenshots.ensure_dir();

        Ok(WebDriverPage::new(driver, self.selectors.clone(), self.base_url.clone()))
    }

    async fn close(&self, session: WebDriverPage) -> TeardownReport {
        let screenshot = match session.driver().screenshot_as_png().await {
            Ok(png) => self.screenshots.write_best_effort(&png),
            Err(e) => {
                warn!("Failed to capture screenshot: {}", e);
                None
            }
        };

        let quit_error = match session.into_driver().quit().await {
            Ok(()) => None,
            Err(e) => {
                warn!("Failed to quit session: {}", e);
                Some(e.to_string())
            }
        };

        info!("Session closed");
        TeardownReport { screenshot, quit_error }
    }
}

async fn configure(driver: &WebDriver, config: &SessionConfig) -> E2eResult<()> {
    driver.set_implicit_wait_timeout(config.implicit_wait()).await?;
    driver
        .set_window_rect(0, 0, config.window_width, config.window_height)
        .await?;
    Ok(())
}
