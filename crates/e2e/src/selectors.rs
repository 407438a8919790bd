//! Lookup keys for the Address Book markup
//!
//! Every XPath the harness uses lives here. A markup change in the
//! application should only ever need an edit in this file (or an override in
//! the `selectors:` section of the runner config).

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::entry::Field;
use crate::oracle::MessageLocation;

/// Element id of each form field in the application's markup
pub fn field_element_id(field: Field) -> &'static str {
    match field {
        Field::FirstName => "addr_first_name",
        Field::LastName => "addr_last_name",
        Field::BusinessName => "addr_business",
        Field::AddressLine1 => "addr_addr_line_1",
        Field::AddressLine2 => "addr_addr_line_2",
        Field::AddressLine3 => "addr_addr_line_3",
        Field::City => "addr_city",
        Field::Province => "addr_region",
        Field::Country => "addr_country",
        Field::Postcode => "addr_post_code",
        Field::Email => "addr_email_1",
        Field::Phone => "addr_phone_1",
        Field::Website => "addr_web_url_1",
    }
}

fn by_id(id: &str) -> String {
    format!("//*[@id='{}']", id)
}

/// XPath lookup keys for every element the tests touch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    /// "Add" entry in the navigation list
    pub add_link: String,

    /// "Return to main" link on the add-entry form
    pub return_link: String,

    pub submit_button: String,
    pub reset_button: String,

    /// Paragraph used for the missing-first-name message
    pub top_level_message: String,

    /// Heading inside the form used for every other message
    pub form_message: String,

    /// Per-field overrides; fields not listed use `//*[@id='<element id>']`
    pub fields: BTreeMap<Field, String>,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            add_link: "/html/body/doctype/ul/li[2]/a".to_string(),
            return_link: "/html/body/form/table[2]/tbody/tr/td[3]/a".to_string(),
            submit_button: by_id("submit_button"),
            reset_button: by_id("reset_button"),
            top_level_message: "/html/body/p".to_string(),
            form_message: "/html/body/form/div/h2".to_string(),
            fields: BTreeMap::new(),
        }
    }
}

impl PageSelectors {
    pub fn field(&self, field: Field) -> String {
        self.fields
            .get(&field)
            .cloned()
            .unwrap_or_else(|| by_id(field_element_id(field)))
    }

    pub fn message(&self, location: MessageLocation) -> &str {
        match location {
            MessageLocation::TopLevel => &self.top_level_message,
            MessageLocation::FormHeading => &self.form_message,
        }
    }
}
