//! Address book entry records
//!
//! An [`EntryRecord`] is one row of form input: thirteen plain-text values in
//! the order the add-entry form lays them out. Values may be empty.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// Number of input fields on the add-entry form
pub const FIELD_COUNT: usize = 13;

/// Logical name of one add-entry form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    BusinessName,
    AddressLine1,
    AddressLine2,
    AddressLine3,
    City,
    Province,
    Country,
    Postcode,
    Email,
    Phone,
    Website,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::FirstName,
        Field::LastName,
        Field::BusinessName,
        Field::AddressLine1,
        Field::AddressLine2,
        Field::AddressLine3,
        Field::City,
        Field::Province,
        Field::Country,
        Field::Postcode,
        Field::Email,
        Field::Phone,
        Field::Website,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::BusinessName => "business_name",
            Field::AddressLine1 => "address_line_1",
            Field::AddressLine2 => "address_line_2",
            Field::AddressLine3 => "address_line_3",
            Field::City => "city",
            Field::Province => "province",
            Field::Country => "country",
            Field::Postcode => "postcode",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Website => "website",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of add-entry form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr", into = "NamedRecord")]
pub struct EntryRecord {
    values: [String; FIELD_COUNT],
}

impl EntryRecord {
    /// Build a record from values in form order
    pub fn from_row(row: [&str; FIELD_COUNT]) -> Self {
        Self {
            values: row.map(String::from),
        }
    }

    /// Build a record from a dynamically sized list of values
    pub fn from_values(values: Vec<String>) -> E2eResult<Self> {
        let count = values.len();
        let values: [String; FIELD_COUNT] = values.try_into().map_err(|_| {
            E2eError::SpecParse(format!(
                "entry row has {} values, expected {}",
                count, FIELD_COUNT
            ))
        })?;
        Ok(Self { values })
    }

    /// Parse a comma-separated row where values may be wrapped in apostrophes.
    ///
    /// `''` is an empty value. A doubled apostrophe inside a quoted value
    /// stands for one literal apostrophe.
    pub fn parse_row(line: &str) -> E2eResult<Self> {
        Self::from_values(split_quoted_row(line)?)
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Builder-style variant of [`EntryRecord::set`]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Iterate `(field, value)` pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    pub fn first_name(&self) -> &str {
        self.get(Field::FirstName)
    }

    pub fn last_name(&self) -> &str {
        self.get(Field::LastName)
    }

    pub fn email(&self) -> &str {
        self.get(Field::Email)
    }

    pub fn phone(&self) -> &str {
        self.get(Field::Phone)
    }
}

fn split_quoted_row(line: &str) -> E2eResult<Vec<String>> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut closed = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    in_quotes = false;
                    closed = true;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            ',' => {
                values.push(finish_value(&mut current, quoted));
                quoted = false;
                closed = false;
            }
            '\'' if !quoted && current.trim().is_empty() => {
                current.clear();
                quoted = true;
                in_quotes = true;
            }
            c if closed => {
                if !c.is_whitespace() {
                    return Err(E2eError::SpecParse(format!(
                        "unexpected {:?} after closing quote in row: {}",
                        c, line
                    )));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(E2eError::SpecParse(format!("unterminated quote in row: {}", line)));
    }

    values.push(finish_value(&mut current, quoted));
    Ok(values)
}

fn finish_value(current: &mut String, quoted: bool) -> String {
    let value = if quoted {
        std::mem::take(current)
    } else {
        current.trim().to_string()
    };
    current.clear();
    value
}

/// Map form of a record as written in YAML suites
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NamedRecord {
    first_name: String,
    last_name: String,
    business_name: String,
    address_line_1: String,
    address_line_2: String,
    address_line_3: String,
    city: String,
    province: String,
    country: String,
    postcode: String,
    email: String,
    phone: String,
    website: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Row(Vec<String>),
    Named(NamedRecord),
}

impl TryFrom<RecordRepr> for EntryRecord {
    type Error = E2eError;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        match repr {
            RecordRepr::Row(values) => EntryRecord::from_values(values),
            RecordRepr::Named(n) => Ok(EntryRecord {
                values: [
                    n.first_name,
                    n.last_name,
                    n.business_name,
                    n.address_line_1,
                    n.address_line_2,
                    n.address_line_3,
                    n.city,
                    n.province,
                    n.country,
                    n.postcode,
                    n.email,
                    n.phone,
                    n.website,
                ],
            }),
        }
    }
}

impl From<EntryRecord> for NamedRecord {
    fn from(record: EntryRecord) -> Self {
        let [
            first_name,
            last_name,
            business_name,
            address_line_1,
            address_line_2,
            address_line_3,
            city,
            province,
            country,
            postcode,
            email,
            phone,
            website,
        ] = record.values;
        NamedRecord {
            first_name,
            last_name,
            business_name,
            address_line_1,
            address_line_2,
            address_line_3,
            city,
            province,
            country,
            postcode,
            email,
            phone,
            website,
        }
    }
}
