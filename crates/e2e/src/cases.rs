//! Test case bodies
//!
//! Each function drives an [`AddressBookPage`] through one scenario and
//! returns `Ok` only if every assertion held. Actions are attempted once.

use tracing::debug;

use crate::entry::{EntryRecord, Field};
use crate::error::{E2eError, E2eResult};
use crate::oracle::{expected_outcome, ExpectedOutcome};
use crate::page::AddressBookPage;
use crate::suite::CaseKind;

/// Title the application's home page must carry
pub const EXPECTED_TITLE: &str = "Address Book";

/// Run one case against an open page
///
/// Returns the predicted outcome for add-entry cases.
pub async fn run_case<P>(page: &mut P, kind: &CaseKind) -> E2eResult<Option<ExpectedOutcome>>
where
    P: AddressBookPage,
{
    match kind {
        CaseKind::Title => {
            check_title(page).await?;
            Ok(None)
        }
        CaseKind::AddEntry { input } => {
            let record = input.resolve()?;
            add_entry(page, &record).await.map(Some)
        }
        CaseKind::ClearForm { input } => {
            let record = input.resolve()?;
            clear_form(page, &record).await?;
            Ok(None)
        }
        CaseKind::ReturnToMain => {
            return_to_main(page).await?;
            Ok(None)
        }
    }
}

pub async fn check_title<P>(page: &mut P) -> E2eResult<()>
where
    P: AddressBookPage,
{
    page.open_home().await?;
    let title = page.title().await?;
    assert_text(EXPECTED_TITLE, &title)
}

/// Submit `record` and compare the rendered message with the oracle
pub async fn add_entry<P>(page: &mut P, record: &EntryRecord) -> E2eResult<ExpectedOutcome>
where
    P: AddressBookPage,
{
    let expected = expected_outcome(record);
    debug!("expecting {:?}: {:?}", expected, expected.message());

    page.open_home().await?;
    page.open_add_form().await?;
    page.fill_entry(record).await?;
    page.submit().await?;

    let actual = page.message_text(expected.location()).await?;
    assert_text(expected.message(), &actual)?;
    Ok(expected)
}

/// Fill the form, press reset, and require every field to read back empty
pub async fn clear_form<P>(page: &mut P, record: &EntryRecord) -> E2eResult<()>
where
    P: AddressBookPage,
{
    page.open_home().await?;
    page.open_add_form().await?;
    page.fill_entry(record).await?;
    page.reset().await?;

    for field in Field::ALL {
        let value = page.field_value(field).await?;
        if !value.is_empty() {
            return Err(E2eError::FieldNotCleared {
                field: field.to_string(),
                value,
            });
        }
    }
    Ok(())
}

/// Open the form, follow "return to main", and require the home page
pub async fn return_to_main<P>(page: &mut P) -> E2eResult<()>
where
    P: AddressBookPage,
{
    page.open_home().await?;
    page.open_add_form().await?;
    page.return_to_main().await?;

    let current = page.current_url().await?;
    let home = page.base_url().to_string();
    if same_page(&home, &current) {
        Ok(())
    } else {
        Err(E2eError::mismatch(home, current))
    }
}

fn assert_text(expected: &str, actual: &str) -> E2eResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::mismatch(expected, actual))
    }
}

/// Whether two URLs name the same page, ignoring query, fragment, a
/// trailing slash and a trailing `index.php` / `index.html`
pub fn same_page(a: &str, b: &str) -> bool {
    normalize_url(a) == normalize_url(b)
}

fn normalize_url(url: &str) -> String {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    let mut path = url[..end].trim_end_matches('/');
    for index in ["index.php", "index.html"] {
        if let Some(stripped) = path.strip_suffix(index) {
            path = stripped.trim_end_matches('/');
        }
    }

    // Scheme and host are case-insensitive, the path is not
    let authority_end = match path.find("://") {
        Some(i) => path[i + 3..].find('/').map(|j| i + 3 + j).unwrap_or(path.len()),
        None => 0,
    };
    let (origin, rest) = path.split_at(authority_end);
    format!("{}{}", origin.to_ascii_lowercase(), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_page_normalisation() {
        let base = "http://localhost/addressbook/";
        assert!(same_page(base, "http://localhost/addressbook"));
        assert!(same_page(base, "http://localhost/addressbook/index.php"));
        assert!(same_page(base, "http://localhost/addressbook/index.php?msg=1#top"));
        assert!(!same_page(base, "http://localhost/addressbook/add.php"));
    }

    #[test]
    fn test_same_page_case_rules() {
        let base = "http://localhost/addressbook/";
        assert!(same_page(base, "HTTP://LocalHost/addressbook/"));
        assert!(same_page("http://Example.COM", "http://example.com/"));
        assert!(!same_page(base, "http://localhost/AddressBook/"));
    }

    #[test]
    fn test_assert_text_is_exact() {
        assert!(assert_text("Address Book", "Address Book").is_ok());
        assert!(assert_text("Address Book", "Address Book ").is_err());
        assert!(assert_text("Address Book", "address book").is_err());
    }
}
