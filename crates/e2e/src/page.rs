//! Page access for the Address Book application
//!
//! [`AddressBookPage`] is the only surface test cases talk to. The WebDriver
//! implementation resolves every logical element through [`PageSelectors`].

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::entry::{EntryRecord, Field};
use crate::error::E2eResult;
use crate::oracle::MessageLocation;
use crate::selectors::PageSelectors;

/// Actions and reads the test cases perform against the application
#[async_trait]
pub trait AddressBookPage: Send {
    /// Base URL the session navigates to
    fn base_url(&self) -> &str;

    async fn open_home(&mut self) -> E2eResult<()>;

    async fn title(&mut self) -> E2eResult<String>;

    async fn current_url(&mut self) -> E2eResult<String>;

    /// Click the "Add" navigation link
    async fn open_add_form(&mut self) -> E2eResult<()>;

    /// Type `value` into one form field
    async fn fill_field(&mut self, field: Field, value: &str) -> E2eResult<()>;

    /// Read the current value of one form field
    async fn field_value(&mut self, field: Field) -> E2eResult<String>;

    async fn submit(&mut self) -> E2eResult<()>;

    async fn reset(&mut self) -> E2eResult<()>;

    /// Click the "return to main" link on the add-entry form
    async fn return_to_main(&mut self) -> E2eResult<()>;

    /// Rendered text of the result message at `location`
    async fn message_text(&mut self, location: MessageLocation) -> E2eResult<String>;

    /// Fill all thirteen fields in form order
    async fn fill_entry(&mut self, record: &EntryRecord) -> E2eResult<()> {
        for (field, value) in record.iter() {
            self.fill_field(field, value).await?;
        }
        Ok(())
    }
}

/// [`AddressBookPage`] backed by a live WebDriver session
pub struct WebDriverPage {
    driver: WebDriver,
    selectors: PageSelectors,
    base_url: String,
}

impl WebDriverPage {
    pub fn new(driver: WebDriver, selectors: PageSelectors, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            selectors,
            base_url: base_url.into(),
        }
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub fn into_driver(self) -> WebDriver {
        self.driver
    }

    async fn element(&self, xpath: &str) -> E2eResult<WebElement> {
        debug!("find: {}", xpath);
        Ok(self.driver.find(By::XPath(xpath)).await?)
    }

    async fn click(&self, xpath: &str) -> E2eResult<()> {
        debug!("click: {}", xpath);
        self.element(xpath).await?.click().await?;
        Ok(())
    }
}

#[async_trait]
impl AddressBookPage for WebDriverPage {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn open_home(&mut self) -> E2eResult<()> {
        debug!("navigate: {}", self.base_url);
        self.driver.goto(&self.base_url).await?;
        Ok(())
    }

    async fn title(&mut self) -> E2eResult<String> {
        Ok(self.driver.title().await?)
    }

    async fn current_url(&mut self) -> E2eResult<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn open_add_form(&mut self) -> E2eResult<()> {
        self.click(&self.selectors.add_link).await
    }

    async fn fill_field(&mut self, field: Field, value: &str) -> E2eResult<()> {
        let xpath = self.selectors.field(field);
        debug!("fill {}: {:?}", field, value);
        self.element(&xpath).await?.send_keys(value).await?;
        Ok(())
    }

    async fn field_value(&mut self, field: Field) -> E2eResult<String> {
        let xpath = self.selectors.field(field);
        let value = self.element(&xpath).await?.value().await?;
        Ok(value.unwrap_or_default())
    }

    async fn submit(&mut self) -> E2eResult<()> {
        self.click(&self.selectors.submit_button).await
    }

    async fn reset(&mut self) -> E2eResult<()> {
        self.click(&self.selectors.reset_button).await
    }

    async fn return_to_main(&mut self) -> E2eResult<()> {
        self.click(&self.selectors.return_link).await
    }

    async fn message_text(&mut self, location: MessageLocation) -> E2eResult<String> {
        let element = self.element(self.selectors.message(location)).await?;
        Ok(element.text().await?)
    }
}
