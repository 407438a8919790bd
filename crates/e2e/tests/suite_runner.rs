//! Runs suites against an in-memory Address Book that mimics the
//! application's pages, so the runner and case logic can be exercised
//! without a browser.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use addressbook_e2e::screenshot::ScreenshotStore;
use addressbook_e2e::{
    AddressBookPage, CaseKind, E2eError, E2eResult, EntryRecord, Field, MessageLocation,
    SessionFactory, TeardownReport, TestCase, TestRunner, TestSuite,
};

const BASE_URL: &str = "http://localhost/addressbook/";

/// Ways the simulated application can misbehave
#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    wrong_title: bool,
    reset_keeps_values: bool,
    typo_in_success_message: bool,
    return_link_goes_nowhere: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Blank,
    Home,
    Form,
    Result {
        paragraph: Option<String>,
        heading: Option<String>,
    },
}

struct SimulatedPage {
    faults: Faults,
    screen: Screen,
    url: String,
    values: BTreeMap<Field, String>,
}

fn not_found(what: &str) -> E2eError {
    E2eError::Io(io::Error::new(io::ErrorKind::NotFound, format!("no such element: {}", what)))
}

impl SimulatedPage {
    fn new(faults: Faults) -> Self {
        Self {
            faults,
            screen: Screen::Blank,
            url: "about:blank".to_string(),
            values: BTreeMap::new(),
        }
    }

    fn require_form(&self, what: &str) -> E2eResult<()> {
        if self.screen == Screen::Form {
            Ok(())
        } else {
            Err(not_found(what))
        }
    }

    fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    // Server-side rules of the application, written independently of the oracle
    fn validate(&self) -> Screen {
        let first = self.value(Field::FirstName).encode_utf16().count();
        let last = self.value(Field::LastName).encode_utf16().count();
        let email = self.value(Field::Email);
        let phone = self.value(Field::Phone).encode_utf16().count();

        let email_ok = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
                    && domain
                        .rsplit_once('.')
                        .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                        .unwrap_or(false)
            }
            None => false,
        };

        let heading = |msg: &str| Screen::Result {
            paragraph: None,
            heading: Some(msg.to_string()),
        };

        if first == 0 {
            Screen::Result {
                paragraph: Some("First name is required".to_string()),
                heading: None,
            }
        } else if first < 2 {
            heading("Firstname cannot be less than 2 characters")
        } else if first > 50 {
            heading("First name must be less than 50 characters")
        } else if last == 0 {
            heading("Last name cannot be empty")
        } else if last < 2 {
            heading("Last name cannot be less than 2 characters")
        } else if last > 50 {
            heading("Last name cannot be more than 50 characters")
        } else if !email_ok {
            heading("Invalid email format")
        } else if phone != 10 {
            heading("Number cannot be less than or more than 10 digits")
        } else if self.faults.typo_in_success_message {
            heading("The new address book entry was added succesfully")
        } else {
            heading("The new address book entry was added successfully")
        }
    }
}

#[async_trait]
impl AddressBookPage for SimulatedPage {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn open_home(&mut self) -> E2eResult<()> {
        self.screen = Screen::Home;
        self.url = BASE_URL.to_string();
        Ok(())
    }

    async fn title(&mut self) -> E2eResult<String> {
        Ok(if self.faults.wrong_title { "Address book" } else { "Address Book" }.to_string())
    }

    async fn current_url(&mut self) -> E2eResult<String> {
        Ok(self.url.clone())
    }

    async fn open_add_form(&mut self) -> E2eResult<()> {
        if self.screen != Screen::Home {
            return Err(not_found("add link"));
        }
        self.screen = Screen::Form;
        self.url = format!("{}add.php", BASE_URL);
        self.values.clear();
        Ok(())
    }

    async fn fill_field(&mut self, field: Field, value: &str) -> E2eResult<()> {
        self.require_form(field.as_str())?;
        self.values.entry(field).or_default().push_str(value);
        Ok(())
    }

    async fn field_value(&mut self, field: Field) -> E2eResult<String> {
        self.require_form(field.as_str())?;
        Ok(self.value(field).to_string())
    }

    async fn submit(&mut self) -> E2eResult<()> {
        self.require_form("submit button")?;
        self.screen = self.validate();
        Ok(())
    }

    async fn reset(&mut self) -> E2eResult<()> {
        self.require_form("reset button")?;
        if !self.faults.reset_keeps_values {
            self.values.clear();
        }
        Ok(())
    }

    async fn return_to_main(&mut self) -> E2eResult<()> {
        self.require_form("return link")?;
        if !self.faults.return_link_goes_nowhere {
            self.screen = Screen::Home;
            self.url = format!("{}index.php", BASE_URL);
        }
        Ok(())
    }

    async fn message_text(&mut self, location: MessageLocation) -> E2eResult<String> {
        let (paragraph, heading) = match &self.screen {
            Screen::Result { paragraph, heading } => (paragraph, heading),
            _ => return Err(not_found("message")),
        };
        let text = match location {
            MessageLocation::TopLevel => paragraph,
            MessageLocation::FormHeading => heading,
        };
        text.clone().ok_or_else(|| not_found("message at location"))
    }
}

#[derive(Default)]
struct Counters {
    opened: usize,
    closed: usize,
}

struct SimulatedSessions {
    faults: Faults,
    fail_open: bool,
    counters: Arc<Mutex<Counters>>,
    screenshots: ScreenshotStore,
}

impl SimulatedSessions {
    fn new(faults: Faults, screenshot_dir: PathBuf) -> Self {
        Self {
            faults,
            fail_open: false,
            counters: Arc::new(Mutex::new(Counters::default())),
            screenshots: ScreenshotStore::new(screenshot_dir),
        }
    }
}

#[async_trait]
impl SessionFactory for SimulatedSessions {
    type Session = SimulatedPage;

    async fn open(&self) -> E2eResult<SimulatedPage> {
        if self.fail_open {
            return Err(E2eError::SessionStartup("no browser available".to_string()));
        }
        self.counters.lock().unwrap().opened += 1;
        self.screenshots.ensure_dir();
        Ok(SimulatedPage::new(self.faults))
    }

    async fn close(&self, session: SimulatedPage) -> TeardownReport {
        self.counters.lock().unwrap().closed += 1;
        let contents = format!("{:?}", session.screen);
        TeardownReport {
            screenshot: self.screenshots.write_best_effort(contents.as_bytes()),
            quit_error: None,
        }
    }
}

#[tokio::test]
async fn builtin_suite_passes_against_conforming_app() {
    let tmp = tempfile::tempdir().unwrap();
    let sessions = SimulatedSessions::new(Faults::default(), tmp.path().join("screenshots"));
    let counters = sessions.counters.clone();
    let runner = TestRunner::new(sessions, tmp.path().join("results"));

    let suite = TestSuite::builtin().unwrap();
    let results = runner.run_suite(&suite).await;

    for r in &results.results {
        assert!(r.success, "{} failed: {:?}", r.name, r.error);
    }
    assert_eq!(results.total, suite.cases.len());
    assert!(results.all_passed());

    let counters = counters.lock().unwrap();
    assert_eq!(counters.opened, suite.cases.len());
    assert_eq!(counters.closed, suite.cases.len());

    let shots = std::fs::read_dir(tmp.path().join("screenshots")).unwrap().count();
    assert_eq!(shots, suite.cases.len());
    assert!(results.results.iter().all(|r| r.screenshot.is_some()));
}

#[tokio::test]
async fn message_mismatch_fails_only_success_cases() {
    let tmp = tempfile::tempdir().unwrap();
    let faults = Faults {
        typo_in_success_message: true,
        ..Default::default()
    };
    let sessions = SimulatedSessions::new(faults, tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());

    let suite = TestSuite::builtin().unwrap().filter_by_tag("add_entry");
    let results = runner.run_suite(&suite).await;

    let failed: Vec<_> = results
        .results
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        failed,
        vec![
            "add-entry/valid-bob",
            "add-entry/valid-charlie",
            "add-entry/numeric-first-name",
            "add-entry/digit-in-first-name",
        ]
    );
    // Teardown ran for the failures too
    assert!(results.results.iter().all(|r| r.screenshot.is_some()));
}

#[tokio::test]
async fn title_mismatch_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let faults = Faults {
        wrong_title: true,
        ..Default::default()
    };
    let sessions = SimulatedSessions::new(faults, tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());

    let case = TestCase::new("title", CaseKind::Title);
    let result = runner.run_case(&case).await;
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("Address Book"), "{}", error);
}

#[tokio::test]
async fn reset_that_keeps_values_fails_clear_form() {
    let tmp = tempfile::tempdir().unwrap();
    let faults = Faults {
        reset_keeps_values: true,
        ..Default::default()
    };
    let sessions = SimulatedSessions::new(faults, tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());

    let suite = TestSuite::builtin().unwrap().filter_by_name("clear-form");
    let results = runner.run_suite(&suite).await;
    assert_eq!(results.failed, 1);
    let error = results.results[0].error.as_deref().unwrap();
    assert!(error.contains("first_name"), "{}", error);
}

#[tokio::test]
async fn return_link_must_reach_home() {
    let tmp = tempfile::tempdir().unwrap();
    let faults = Faults {
        return_link_goes_nowhere: true,
        ..Default::default()
    };
    let sessions = SimulatedSessions::new(faults, tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());

    let result = runner
        .run_case(&TestCase::new("back", CaseKind::ReturnToMain))
        .await;
    assert!(!result.success);
}

#[tokio::test]
async fn session_startup_failure_is_recorded_per_case() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sessions = SimulatedSessions::new(Faults::default(), tmp.path().to_path_buf());
    sessions.fail_open = true;
    let runner = TestRunner::new(sessions, tmp.path());

    let suite = TestSuite::builtin().unwrap();
    let results = runner.run_suite(&suite).await;
    assert_eq!(results.failed, suite.cases.len());
    assert!(results.results[0].error.as_deref().unwrap().contains("no browser available"));
}

#[tokio::test]
async fn unwritable_screenshot_dir_does_not_fail_case() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("screenshots");
    std::fs::write(&blocker, b"a file where the directory should be").unwrap();

    let runner = TestRunner::new(SimulatedSessions::new(Faults::default(), blocker), tmp.path());
    let result = runner.run_case(&TestCase::new("title", CaseKind::Title)).await;

    assert!(result.success, "{:?}", result.error);
    assert!(result.screenshot.is_none());
}

#[tokio::test]
async fn expected_outcome_is_recorded_for_add_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let sessions = SimulatedSessions::new(Faults::default(), tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());

    let record = EntryRecord::default()
        .with(Field::FirstName, "Ann")
        .with(Field::LastName, "Lee")
        .with(Field::Email, "ann@example.com")
        .with(Field::Phone, "123");
    let result = runner.run_case(&TestCase::add_entry("short-phone", record)).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.expected.map(|o| o.message()),
        Some("Number cannot be less than or more than 10 digits")
    );

    let empty = addressbook_e2e::TestSuiteResult::merge("one", vec![]);
    let path = runner.write_results(&empty).unwrap();
    assert!(path.ends_with("test-results.json"));
}

#[tokio::test]
async fn shipped_specs_and_config_load_and_pass() {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config =
        addressbook_e2e::config::RunnerConfig::from_file(&manifest.join("e2e.example.yaml"))
            .unwrap();
    assert_eq!(config.target.base_url, BASE_URL);

    let suites = TestSuite::load_all(&manifest.join("specs")).unwrap();
    assert!(!suites.is_empty());

    let tmp = tempfile::tempdir().unwrap();
    let sessions = SimulatedSessions::new(Faults::default(), tmp.path().to_path_buf());
    let runner = TestRunner::new(sessions, tmp.path());
    for suite in &suites {
        let results = runner.run_suite(suite).await;
        for r in &results.results {
            assert!(r.success, "{}/{} failed: {:?}", suite.name, r.name, r.error);
        }
    }
}
