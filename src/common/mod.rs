pub mod error;
pub mod types;

pub use error::{PageError, ScraperError};
pub use types::{ChatMessage, MessageId};
