use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use crate::common::{PageError, ScraperError};
use crate::config::AppConfig;

use super::page::{MessageNode, OverlayPage};

impl From<CmdError> for PageError {
    fn from(err: CmdError) -> Self {
        PageError::Command(err.to_string())
    }
}

/// Overlay page driven through a WebDriver (chromedriver) session.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Starts a browser session and navigates it to `url`.
    ///
    /// If navigation fails the session is closed before returning.
    pub async fn open(config: &AppConfig, url: &str) -> Result<Self, ScraperError> {
        let client = ClientBuilder::native()
            .capabilities(browser_capabilities(config))
            .connect(&config.webdriver_url)
            .await
            .map_err(|err| {
                ScraperError::Session(format!(
                    "cannot reach webdriver at {}: {err}",
                    config.webdriver_url
                ))
            })?;

        log::info!("Attempting to load Fusion Chat overlay: {url}");
        if let Err(err) = client.goto(url).await {
            if let Err(close_err) = client.close().await {
                log::warn!("Failed to close browser session: {close_err}");
            }
            return Err(ScraperError::Session(format!(
                "error loading URL '{url}': {err}"
            )));
        }
        log::info!("Loaded Fusion Chat overlay: {url}");

        Ok(Self { client })
    }
}

fn browser_capabilities(config: &AppConfig) -> Capabilities {
    let mut args = config.browser_args.clone();
    if config.headless && !args.iter().any(|arg| arg.starts_with("--headless")) {
        args.push("--headless=new".to_string());
    }

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

impl OverlayPage for WebDriverPage {
    type Node = WebDriverNode;

    async fn find_all(&self, selector: &str) -> Result<Vec<WebDriverNode>, PageError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements
            .into_iter()
            .map(|element| WebDriverNode { element })
            .collect())
    }

    async fn close(self) -> Result<(), PageError> {
        self.client.close().await?;
        Ok(())
    }
}

pub struct WebDriverNode {
    element: Element,
}

impl MessageNode for WebDriverNode {
    async fn child_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        match self.element.find(Locator::Css(selector)).await {
            Ok(child) => Ok(Some(child.text().await?.trim().to_string())),
            Err(err) if err.is_no_such_element() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.element.attr(name).await?)
    }

    async fn text(&self) -> Result<String, PageError> {
        Ok(self.element.text().await?)
    }

    async fn inner_html(&self) -> Result<String, PageError> {
        Ok(self.element.html(true).await?)
    }
}
