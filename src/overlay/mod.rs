pub mod extractor;
pub mod page;
pub mod poller;
pub mod url;
pub mod webdriver;

#[cfg(test)]
pub mod fake;

pub use poller::{ChatPoller, PollSummary};
pub use url::validate_overlay_url;
pub use webdriver::WebDriverPage;
