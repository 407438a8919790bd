//! Address Book E2E Test Framework
//!
//! This crate drives a real browser over WebDriver against the Address Book
//! web application:
//! - Opens one exclusive browser session per test case
//! - Fills the add-entry form and checks the rendered message against a
//!   re-implementation of the application's validation rules
//! - Captures a timestamped screenshot after every case
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   E2E Test Runner (Rust)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner<F: SessionFactory>                              │
//! │    ├── open()  -> session (setUp: implicit wait, dirs)      │
//! │    ├── run_case(session, case) -> Result                    │
//! │    └── close(session) -> TeardownReport (screenshot, quit)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSuite (built-in or YAML)                               │
//! │    └── cases: [TestCase]                                    │
//! │          ├── title                                          │
//! │          ├── add_entry { record | row }                     │
//! │          ├── clear_form { record | row }                    │
//! │          └── return_to_main                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  AddressBookPage  ── PageSelectors (all XPaths)             │
//! │  oracle::expected_outcome(record) -> ExpectedOutcome        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod config;
pub mod driver;
pub mod entry;
pub mod error;
pub mod oracle;
pub mod page;
pub mod runner;
pub mod screenshot;
pub mod selectors;
pub mod session;
pub mod suite;

pub use entry::{EntryRecord, Field};
pub use error::{E2eError, E2eResult};
pub use oracle::{expected_outcome, ExpectedOutcome, MessageLocation};
pub use page::AddressBookPage;
pub use runner::{TestResult, TestRunner, TestSuiteResult};
pub use session::{SessionFactory, TeardownReport};
pub use suite::{CaseKind, TestCase, TestSuite};
