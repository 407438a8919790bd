//! Main test runner that brackets every case with its own session

use std::path::{Path, PathBuf};
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::cases::run_case;
use crate::error::E2eResult;
use crate::oracle::ExpectedOutcome;
use crate::screenshot::ScreenshotRecord;
use crate::session::{SessionFactory, TeardownReport};
use crate::suite::{TestCase, TestSuite};

/// Result of running a single test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,

    /// Predicted message, for add-entry cases
    pub expected: Option<ExpectedOutcome>,

    pub error: Option<String>,
    pub screenshot: Option<ScreenshotRecord>,
    pub teardown_error: Option<String>,
}

/// Result of running all cases of a suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Fold several suite results into one report
    pub fn merge(name: &str, parts: Vec<TestSuiteResult>) -> Self {
        let mut merged = TestSuiteResult {
            suite: name.to_string(),
            total: 0,
            passed: 0,
            failed: 0,
            duration_ms: 0,
            results: Vec::new(),
        };
        for part in parts {
            merged.total += part.total;
            merged.passed += part.passed;
            merged.failed += part.failed;
            merged.duration_ms += part.duration_ms;
            merged.results.extend(part.results);
        }
        merged
    }
}

/// Runs test cases, one exclusive session per case
pub struct TestRunner<F: SessionFactory> {
    sessions: F,
    output_dir: PathBuf,
}

impl<F: SessionFactory> TestRunner<F> {
    pub fn new(sessions: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions,
            output_dir: output_dir.into(),
        }
    }

    /// Run every case of `suite` in order
    pub async fn run_suite(&self, suite: &TestSuite) -> TestSuiteResult {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.cases.len());

        info!("Running {} case(s) from suite '{}'...", suite.cases.len(), suite.name);

        for case in &suite.cases {
            let result = self.run_case(case).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("Test Results: {} passed, {} failed ({} ms)", passed, failed, duration_ms);

        TestSuiteResult {
            suite: suite.name.clone(),
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run one case: setup, body, and a teardown that always happens
    pub async fn run_case(&self, case: &TestCase) -> TestResult {
        let start = Instant::now();
        debug!("Running case: {}", case.name);

        let mut session = match self.sessions.open().await {
            Ok(session) => session,
            Err(e) => {
                return TestResult {
                    name: case.name.clone(),
                    success: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    expected: None,
                    error: Some(e.to_string()),
                    screenshot: None,
                    teardown_error: None,
                };
            }
        };

        let outcome = run_case(&mut session, &case.kind).await;
        let TeardownReport { screenshot, quit_error } = self.sessions.close(session).await;

        let (expected, error) = match outcome {
            Ok(expected) => (expected, None),
            Err(e) => (None, Some(e.to_string())),
        };

        TestResult {
            name: case.name.clone(),
            success: error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            expected,
            error,
            screenshot,
            teardown_error: quit_error,
        }
    }

    /// Write results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        write_results(&self.output_dir, results)
    }
}

pub fn write_results(output_dir: &Path, results: &TestSuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, success: bool) -> TestResult {
        TestResult {
            name: name.to_string(),
            success,
            duration_ms: 1,
            expected: None,
            error: (!success).then(|| "boom".to_string()),
            screenshot: None,
            teardown_error: None,
        }
    }

    #[test]
    fn test_merge_sums_counts() {
        let a = TestSuiteResult {
            suite: "a".into(),
            total: 2,
            passed: 1,
            failed: 1,
            duration_ms: 5,
            results: vec![result("a1", true), result("a2", false)],
        };
        let b = TestSuiteResult {
            suite: "b".into(),
            total: 1,
            passed: 1,
            failed: 0,
            duration_ms: 3,
            results: vec![result("b1", true)],
        };
        let merged = TestSuiteResult::merge("all", vec![a, b]);
        assert_eq!(merged.total, 3);
        assert_eq!(merged.failed, 1);
        assert_eq!(merged.duration_ms, 8);
        assert!(!merged.all_passed());
    }

    #[test]
    fn test_write_results_json() {
        let tmp = tempfile::tempdir().unwrap();
        let results = TestSuiteResult::merge("empty", vec![]);
        let path = write_results(&tmp.path().join("out"), &results).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed["suite"], "empty");
        assert_eq!(parsed["total"], 0);
    }
}
