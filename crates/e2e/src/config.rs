//! Runner configuration

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::driver::DriverConfig;
use crate::error::{E2eError, E2eResult};
use crate::selectors::PageSelectors;
use crate::session::SessionConfig;

pub const ENV_BASE_URL: &str = "ADDRESSBOOK_BASE_URL";
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";

/// The application under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/addressbook/".to_string(),
        }
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub target: TargetConfig,
    pub session: SessionConfig,

    /// Spawn a local WebDriver server instead of using `session.webdriver_url`
    pub driver: Option<DriverConfig>,

    pub selectors: PageSelectors,

    /// Directory of YAML suites; the built-in suite runs when unset
    pub suites_dir: Option<PathBuf>,

    pub output_dir: PathBuf,
}

impl RunnerConfig {
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (the environment, in production)
    pub fn apply_overrides<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.target.base_url = url;
        }
        if let Some(url) = lookup(ENV_WEBDRIVER_URL).filter(|v| !v.is_empty()) {
            self.session.webdriver_url = url;
        }
    }

    pub fn validate(&self) -> E2eResult<()> {
        for (name, url) in [
            ("target.base_url", &self.target.base_url),
            ("session.webdriver_url", &self.session.webdriver_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(E2eError::Config(format!("{} must be an http(s) URL: {}", name, url)));
            }
        }
        if self.session.implicit_wait_secs == 0 {
            return Err(E2eError::Config("session.implicit_wait_secs must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            session: SessionConfig::default(),
            driver: None,
            selectors: PageSelectors::default(),
            suites_dir: None,
            output_dir: PathBuf::from("test-results"),
        }
    }
}
