use std::fmt;

use super::{push, push_flag, push_opt, CustomRequestParameters, GeoCode, QueryPairs, QueryParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPrivacy {
    Public,
    Private,
}

impl fmt::Display for ListPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListPrivacy::Public => f.write_str("public"),
            ListPrivacy::Private => f.write_str("private"),
        }
    }
}

/// Changes applied to an existing list. Unset fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListUpdateParameters {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<ListPrivacy>,
    pub custom: CustomRequestParameters,
}

impl QueryParameters for ListUpdateParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "name", self.name.as_ref());
        push_opt(&mut pairs, "description", self.description.as_ref());
        push_opt(&mut pairs, "mode", self.privacy);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

/// Paging and filtering for the tweets of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetsFromListParameters {
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub maximum_number_of_tweets: u32,
    pub include_entities: bool,
    pub include_retweets: bool,
    pub custom: CustomRequestParameters,
}

impl Default for TweetsFromListParameters {
    fn default() -> Self {
        Self {
            since_id: None,
            max_id: None,
            maximum_number_of_tweets: 20,
            include_entities: true,
            include_retweets: false,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for TweetsFromListParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "since_id", self.since_id);
        push_opt(&mut pairs, "max_id", self.max_id);
        push(&mut pairs, "count", self.maximum_number_of_tweets);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        push_flag(&mut pairs, "include_rts", self.include_retweets, false);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResultType {
    Mixed,
    Recent,
    Popular,
}

impl fmt::Display for SearchResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResultType::Mixed => f.write_str("mixed"),
            SearchResultType::Recent => f.write_str("recent"),
            SearchResultType::Popular => f.write_str("popular"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TweetSearchParameters {
    pub search_query: String,
    pub geo_code: Option<GeoCode>,
    pub lang: Option<String>,
    pub locale: Option<String>,
    pub result_type: Option<SearchResultType>,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    /// `YYYY-MM-DD`
    pub until: Option<String>,
    pub maximum_number_of_results: u32,
    pub include_entities: bool,
    pub custom: CustomRequestParameters,
}

impl Default for TweetSearchParameters {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            geo_code: None,
            lang: None,
            locale: None,
            result_type: None,
            since_id: None,
            max_id: None,
            until: None,
            maximum_number_of_results: 100,
            include_entities: true,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for TweetSearchParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "q", &self.search_query);
        if let Some(geo) = &self.geo_code {
            pairs.extend(geo.query_pairs());
        }
        push_opt(&mut pairs, "lang", self.lang.as_ref());
        push_opt(&mut pairs, "locale", self.locale.as_ref());
        push_opt(&mut pairs, "result_type", self.result_type);
        push_opt(&mut pairs, "since_id", self.since_id);
        push_opt(&mut pairs, "max_id", self.max_id);
        push_opt(&mut pairs, "until", self.until.as_ref());
        push(&mut pairs, "count", self.maximum_number_of_results);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserSearchParameters {
    pub search_query: String,
    pub page: Option<u32>,
    pub maximum_number_of_results: u32,
    pub include_entities: bool,
    pub custom: CustomRequestParameters,
}

impl Default for UserSearchParameters {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            page: None,
            maximum_number_of_results: 20,
            include_entities: true,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for UserSearchParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "q", &self.search_query);
        push_opt(&mut pairs, "page", self.page);
        push(&mut pairs, "count", self.maximum_number_of_results);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishTweetParameters {
    pub text: String,
    pub in_reply_to_tweet_id: Option<u64>,
    pub media_ids: Vec<u64>,
    pub possibly_sensitive: Option<bool>,
    /// (latitude, longitude)
    pub coordinates: Option<(f64, f64)>,
    pub custom: CustomRequestParameters,
}

impl QueryParameters for PublishTweetParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "status", &self.text);
        push_opt(&mut pairs, "in_reply_to_status_id", self.in_reply_to_tweet_id);
        if !self.media_ids.is_empty() {
            let ids = self.media_ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            push(&mut pairs, "media_ids", ids);
        }
        push_opt(&mut pairs, "possibly_sensitive", self.possibly_sensitive);
        if let Some((lat, long)) = self.coordinates {
            push(&mut pairs, "lat", lat);
            push(&mut pairs, "long", long);
        }
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

/// Account settings to change. Unset fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSettingsParameters {
    pub language: Option<String>,
    pub time_zone: Option<String>,
    pub sleep_time_enabled: Option<bool>,
    pub start_sleep_hour: Option<u8>,
    pub end_sleep_hour: Option<u8>,
    pub trend_location_woeid: Option<u64>,
    pub custom: CustomRequestParameters,
}

impl QueryParameters for AccountSettingsParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "lang", self.language.as_ref());
        push_opt(&mut pairs, "time_zone", self.time_zone.as_ref());
        push_opt(&mut pairs, "sleep_time_enabled", self.sleep_time_enabled);
        push_opt(&mut pairs, "start_sleep_time", self.start_sleep_hour);
        push_opt(&mut pairs, "end_sleep_time", self.end_sleep_hour);
        push_opt(&mut pairs, "trend_location_woeid", self.trend_location_woeid);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &QueryPairs) -> Vec<&str> {
        pairs.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn search_renders_set_fields_then_custom() {
        let mut search = TweetSearchParameters {
            search_query: "rust".to_string(),
            result_type: Some(SearchResultType::Recent),
            ..TweetSearchParameters::default()
        };
        search.custom.add("tweet_mode", "extended");

        let pairs = search.query_pairs();
        assert_eq!(names(&pairs), vec!["q", "result_type", "count", "tweet_mode"]);
        assert_eq!(pairs[1].1, "recent");
    }

    #[test]
    fn publish_joins_media_ids() {
        let tweet = PublishTweetParameters {
            text: "hello".to_string(),
            media_ids: vec![1, 2, 3],
            ..PublishTweetParameters::default()
        };
        let pairs = tweet.query_pairs();
        assert_eq!(pairs[1], ("media_ids".to_string(), "1,2,3".to_string()));
    }

    #[test]
    fn empty_updates_render_nothing() {
        assert!(ListUpdateParameters::default().query_pairs().is_empty());
        assert!(AccountSettingsParameters::default().query_pairs().is_empty());
    }
}
