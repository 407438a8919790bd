//! Test cases and suites
//!
//! Suites are either the built-in Address Book table or declarative YAML
//! files:
//!
//! ```yaml
//! name: smoke
//! cases:
//!   - name: title
//!     case: title
//!   - name: add-valid
//!     case: add_entry
//!     tags: [valid]
//!     row: "'Bob', 'Peter', 'Tester', '4th St', '', '', 'Los Angeles', 'CA', 'United States', '1231231234', 'bob.peter@example.com', '1231231234', 'www.example.com'"
//!   - name: add-missing-phone
//!     case: add_entry
//!     record: { first_name: Ann, last_name: Lee, email: ann@example.com }
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::entry::EntryRecord;
use crate::error::{E2eError, E2eResult};

/// The record the clear-form case types before pressing reset
pub const CLEAR_FORM_ROW: &str = "'Jane', 'Doe', 'Designer', '8th St', '', '', 'Seattle', 'WA', 'United States', '6786786789', 'jane.doeexample.com', '6786786789', 'www.example.com'";

/// Add-entry rows of the built-in suite, with a short label each
pub const ADD_ENTRY_ROWS: [(&str, &str); 8] = [
    ("all-fields-empty", "'', '', '', '', '', '', '', '', '', '', '','',''"),
    ("first-name-min-length", "'A', 'Bikey', 'QA analyst', '2nd St', '', '', 'New York', 'NY', 'United States', '1234567890', 'a.smith@example.com', '1234567890', 'www.example.com'"),
    ("long-last-name", "'Andy', 'Aedddddddddddddddddddddaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa', 'Developer', '3rd St', '', '', 'Toronto', 'Ontario', 'Canada', '0987654321', 'andy.dev@example.com', '0987654321', 'www.example.com'"),
    ("valid-bob", "'Bob', 'Peter', 'Tester', '4th St', '', '', 'Los Angeles', 'CA', 'United States', '1231231234', 'bob.peter@example.com', '1231231234', 'www.example.com'"),
    ("valid-charlie", "'Charlie', 'White', 'Manager', '5th St', '', '', 'Chicago', 'IL', 'United States', '3213214321', 'charlie.white@example.com', '3213214321', 'www.example.com'"),
    ("numeric-first-name", "'123', 'Black', 'Consultant', '6th St', '', '', 'Houston', 'TX', 'United States', '4564564567', '123.black@example.com', '4564564567', 'www.example.com'"),
    ("digit-in-first-name", "'J0hn', 'Doe', 'Engineer', '7th St', '', '', 'San Francisco', 'CA', 'United States', '5675675678', 'john.doe@example.com', '5675675678', 'www.example.com'"),
    ("invalid-email", "'Jane', 'Doe', 'Designer', '8th St', '', '', 'Seattle', 'WA', 'United States', '6786786789', 'jane.doeexample.com', '6786786789', 'www.example.com'"),
];

/// What a test case does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "case", rename_all = "snake_case")]
pub enum CaseKind {
    /// Home page title must be "Address Book"
    Title,

    /// Submit a record and check the predicted message
    AddEntry {
        #[serde(flatten)]
        input: RecordInput,
    },

    /// Fill the form, press reset, expect every field empty
    ClearForm {
        #[serde(flatten)]
        input: RecordInput,
    },

    /// Open the form, follow "return to main", expect the home page
    ReturnToMain,
}

/// A record given either as a structured value or as a quoted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordInput {
    Record(EntryRecord),
    Row(String),
}

impl RecordInput {
    pub fn resolve(&self) -> E2eResult<EntryRecord> {
        match self {
            RecordInput::Record(record) => Ok(record.clone()),
            RecordInput::Row(row) => EntryRecord::parse_row(row),
        }
    }
}

impl From<EntryRecord> for RecordInput {
    fn from(record: EntryRecord) -> Self {
        RecordInput::Record(record)
    }
}

/// A single named test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub kind: CaseKind,
}

impl TestCase {
    pub fn new(name: impl Into<String>, kind: CaseKind) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            kind,
        }
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn add_entry(name: impl Into<String>, record: EntryRecord) -> Self {
        Self::new(name, CaseKind::AddEntry { input: record.into() }).tagged("add_entry")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// An ordered collection of test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// The Address Book suite: title check, the add-entry table, the
    /// clear-form and return-to-main checks
    pub fn builtin() -> E2eResult<Self> {
        let mut cases = vec![TestCase::new("title-page", CaseKind::Title).tagged("smoke")];

        for (label, row) in ADD_ENTRY_ROWS {
            cases.push(TestCase::add_entry(
                format!("add-entry/{}", label),
                EntryRecord::parse_row(row)?,
            ));
        }

        cases.push(
            TestCase::new(
                "clear-form",
                CaseKind::ClearForm {
                    input: EntryRecord::parse_row(CLEAR_FORM_ROW)?.into(),
                },
            )
            .tagged("form"),
        );
        cases.push(
            TestCase::new("return-to-main-menu", CaseKind::ReturnToMain).tagged("navigation"),
        );

        Ok(Self {
            name: "addressbook".to_string(),
            description: "Add-entry form validation for the Address Book application".to_string(),
            cases,
        })
    }

    /// Parse a suite from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let suite: Self = serde_yaml::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Parse a suite from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all suites from a directory, sorted by path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        if !dir.is_dir() {
            return Err(E2eError::SpecParse(format!(
                "suite directory {} does not exist",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in walkdir::WalkDir::new(dir) {
            let entry =
                entry.map_err(|e| E2eError::SpecParse(format!("{}: {}", dir.display(), e)))?;
            let is_yaml = entry
                .path()
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            if is_yaml {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::from_file(p)).collect()
    }

    /// Every row must parse and every case name must be unique
    fn validate(&self) -> E2eResult<()> {
        let mut seen = std::collections::HashSet::new();
        for case in &self.cases {
            if !seen.insert(case.name.as_str()) {
                return Err(E2eError::SpecParse(format!("duplicate case name: {}", case.name)));
            }
            match &case.kind {
                CaseKind::AddEntry { input } | CaseKind::ClearForm { input } => {
                    input.resolve()?;
                }
                CaseKind::Title | CaseKind::ReturnToMain => {}
            }
        }
        Ok(())
    }

    /// Keep only cases carrying `tag`
    pub fn filter_by_tag(mut self, tag: &str) -> Self {
        self.cases.retain(|c| c.has_tag(tag));
        self
    }

    /// Keep only cases whose name contains `pattern`
    pub fn filter_by_name(mut self, pattern: &str) -> Self {
        self.cases.retain(|c| c.name.contains(pattern));
        self
    }
}
