//! Request parameter objects.
//!
//! Every parameter object renders the fields the caller set, or that differ
//! from the API defaults, as query pairs, followed by any custom pairs the
//! caller added. Page sizes (`count`) are the exception: they are always
//! sent, so a default object still renders its `count` pair.
//! They are registered as transient services, so
//! [`get_owned`](ferrous_container::Resolver::get_owned) hands out a fresh
//! value the caller can fill in.

use std::fmt::Display;

mod identifiers;
mod query;
mod requests;
mod timelines;

pub use identifiers::{DistanceMeasure, GeoCode, ListIdentifier, TweetIdentifier, UserIdentifier};
pub use query::TweetsFromListQuery;
pub use requests::{
    AccountSettingsParameters, ListPrivacy, ListUpdateParameters, PublishTweetParameters, SearchResultType,
    TweetSearchParameters, TweetsFromListParameters, UserSearchParameters,
};
pub use timelines::{
    HomeTimelineParameters, LatestMessagesReceivedParameters, LatestMessagesSentParameters,
    MentionsTimelineParameters, RetweetsOfMeTimelineParameters, TimelineParameters, UserTimelineParameters,
};

/// Query pairs in the order they should appear in the request.
pub type QueryPairs = Vec<(String, String)>;

/// Renders a parameter object as query pairs.
pub trait QueryParameters {
    fn query_pairs(&self) -> QueryPairs;
}

/// Arbitrary extra pairs attached to a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomRequestParameters {
    pairs: QueryPairs,
}

impl CustomRequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair, replacing an earlier pair with the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(n, _)| n != name);
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The pairs as `name=value&...`, unencoded.
    pub fn format_custom_query(&self) -> String {
        self.pairs
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl QueryParameters for CustomRequestParameters {
    fn query_pairs(&self) -> QueryPairs {
        self.pairs.clone()
    }
}

pub(crate) fn push(pairs: &mut QueryPairs, name: &str, value: impl Display) {
    pairs.push((name.to_string(), value.to_string()));
}

pub(crate) fn push_opt<T: Display>(pairs: &mut QueryPairs, name: &str, value: Option<T>) {
    if let Some(value) = value {
        push(pairs, name, value);
    }
}

pub(crate) fn push_flag(pairs: &mut QueryPairs, name: &str, value: bool, default: bool) {
    if value != default {
        push(pairs, name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_pairs_replace_by_name() {
        let mut custom = CustomRequestParameters::new();
        custom.add("lang", "en");
        custom.add("tweet_mode", "extended");
        custom.add("lang", "fr");

        assert_eq!(custom.format_custom_query(), "lang=fr&tweet_mode=extended");
        custom.remove("lang");
        assert_eq!(custom.pairs().len(), 1);
    }

    #[test]
    fn flags_only_render_when_not_default() {
        let mut pairs = QueryPairs::new();
        push_flag(&mut pairs, "trim_user", false, false);
        push_flag(&mut pairs, "include_entities", false, true);
        assert_eq!(pairs, vec![("include_entities".to_string(), "false".to_string())]);
    }
}
