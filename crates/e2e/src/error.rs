//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("WebDriver session failed to start: {0}")]
    SessionStartup(String),

    #[error("WebDriver server failed to start: {0}")]
    DriverStartup(String),

    #[error("WebDriver health check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("Assertion failed: expected {expected:?}, got {actual:?}")]
    AssertionFailed { expected: String, actual: String },

    #[error("Field {field} was not cleared: still contains {value:?}")]
    FieldNotCleared { field: String, value: String },

    #[error("Test suite parse error: {0}")]
    SpecParse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Build an assertion failure from an expected and actual value
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        E2eError::AssertionFailed {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
