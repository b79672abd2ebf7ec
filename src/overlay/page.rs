use std::future::Future;

use crate::common::PageError;

/// A rendered page that can be queried by CSS selector.
pub trait OverlayPage: Send + Sync {
    type Node: MessageNode;

    fn find_all(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Self::Node>, PageError>> + Send;

    /// Ends the browser session.
    fn close(self) -> impl Future<Output = Result<(), PageError>> + Send;
}

/// A single chat entry element.
pub trait MessageNode: Send + Sync {
    /// Trimmed text of the first descendant matching `selector`, or `None`
    /// when no such descendant exists.
    fn child_text(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Option<String>, PageError>> + Send;

    fn attribute(&self, name: &str)
    -> impl Future<Output = Result<Option<String>, PageError>> + Send;

    fn text(&self) -> impl Future<Output = Result<String, PageError>> + Send;

    fn inner_html(&self) -> impl Future<Output = Result<String, PageError>> + Send;
}
