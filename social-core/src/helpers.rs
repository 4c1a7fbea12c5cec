//! Small infrastructure services.

use std::borrow::Cow;
use std::thread::{self, ThreadId};
use std::time::Duration;

/// Thread-bound helper; one instance per OS thread.
#[derive(Debug)]
pub struct ThreadHelper {
    owner: ThreadId,
}

impl ThreadHelper {
    pub fn new() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// The thread this helper was created on.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    pub fn sleep(&self, duration: Duration) {
        tracing::trace!(?duration, "sleeping");
        thread::sleep(duration);
    }
}

impl Default for ThreadHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// URL encoding for query strings.
#[derive(Debug, Default)]
pub struct HttpUtility;

impl HttpUtility {
    pub fn new() -> Self {
        Self
    }

    pub fn url_encode<'a>(&self, value: &'a str) -> Cow<'a, str> {
        urlencoding::encode(value)
    }

    /// Decodes percent-escapes; invalid UTF-8 is replaced.
    pub fn url_decode(&self, value: &str) -> String {
        match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned(),
        }
    }

    /// Joins `pairs` into `name=value&...` with both sides encoded.
    pub fn build_query(&self, pairs: &[(String, String)]) -> String {
        pairs
            .iter()
            .map(|(name, value)| format!("{}={}", self.url_encode(name), self.url_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the encoded `pairs` to `base`, respecting an existing query.
    pub fn add_query(&self, base: &str, pairs: &[(String, String)]) -> String {
        if pairs.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, self.build_query(pairs))
    }
}
