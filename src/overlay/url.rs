use std::sync::OnceLock;

use regex::Regex;

use crate::common::ScraperError;

fn scheme_pattern() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| Regex::new(r"^https?://").expect("valid scheme regex"))
}

/// True when `url` is http(s) and points somewhere under `expected_path`.
pub fn is_valid_overlay_url(url: &str, expected_path: &str) -> bool {
    scheme_pattern().is_match(url) && url.contains(expected_path)
}

pub fn validate_overlay_url(url: &str, expected_path: &str) -> Result<(), ScraperError> {
    if is_valid_overlay_url(url, expected_path) {
        Ok(())
    } else {
        Err(ScraperError::InvalidUrl {
            url: url.to_string(),
            expected: expected_path.to_string(),
        })
    }
}
