use super::{push, push_flag, push_opt, CustomRequestParameters, QueryPairs, QueryParameters, UserIdentifier};

/// Fields shared by every timeline request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineParameters {
    pub maximum_number_of_tweets: u32,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub trim_user: bool,
    pub include_entities: bool,
}

impl Default for TimelineParameters {
    fn default() -> Self {
        Self {
            maximum_number_of_tweets: 40,
            since_id: None,
            max_id: None,
            trim_user: false,
            include_entities: true,
        }
    }
}

impl QueryParameters for TimelineParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "count", self.maximum_number_of_tweets);
        push_opt(&mut pairs, "since_id", self.since_id);
        push_opt(&mut pairs, "max_id", self.max_id);
        push_flag(&mut pairs, "trim_user", self.trim_user, false);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeTimelineParameters {
    pub timeline: TimelineParameters,
    pub exclude_replies: bool,
    pub include_contributor_details: bool,
    pub custom: CustomRequestParameters,
}

impl QueryParameters for HomeTimelineParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.timeline.query_pairs();
        push_flag(&mut pairs, "exclude_replies", self.exclude_replies, false);
        push_flag(
            &mut pairs,
            "contributor_details",
            self.include_contributor_details,
            false,
        );
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserTimelineParameters {
    pub timeline: TimelineParameters,
    pub user: UserIdentifier,
    pub exclude_replies: bool,
    pub include_retweets: bool,
    pub custom: CustomRequestParameters,
}

impl Default for UserTimelineParameters {
    fn default() -> Self {
        Self {
            timeline: TimelineParameters::default(),
            user: UserIdentifier::default(),
            exclude_replies: false,
            include_retweets: true,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for UserTimelineParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.user.query_pairs();
        pairs.extend(self.timeline.query_pairs());
        push_flag(&mut pairs, "exclude_replies", self.exclude_replies, false);
        push_flag(&mut pairs, "include_rts", self.include_retweets, true);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MentionsTimelineParameters {
    pub timeline: TimelineParameters,
    pub include_contributor_details: bool,
    pub custom: CustomRequestParameters,
}

impl QueryParameters for MentionsTimelineParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.timeline.query_pairs();
        push_flag(
            &mut pairs,
            "contributor_details",
            self.include_contributor_details,
            false,
        );
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetweetsOfMeTimelineParameters {
    pub timeline: TimelineParameters,
    pub include_user_entities: bool,
    pub custom: CustomRequestParameters,
}

impl Default for RetweetsOfMeTimelineParameters {
    fn default() -> Self {
        Self {
            timeline: TimelineParameters::default(),
            include_user_entities: true,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for RetweetsOfMeTimelineParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.timeline.query_pairs();
        push_flag(&mut pairs, "include_user_entities", self.include_user_entities, true);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestMessagesReceivedParameters {
    pub maximum_number_of_messages: u32,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub include_entities: bool,
    pub skip_status: bool,
    pub custom: CustomRequestParameters,
}

impl Default for LatestMessagesReceivedParameters {
    fn default() -> Self {
        Self {
            maximum_number_of_messages: 40,
            since_id: None,
            max_id: None,
            include_entities: true,
            skip_status: false,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for LatestMessagesReceivedParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "count", self.maximum_number_of_messages);
        push_opt(&mut pairs, "since_id", self.since_id);
        push_opt(&mut pairs, "max_id", self.max_id);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        push_flag(&mut pairs, "skip_status", self.skip_status, false);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestMessagesSentParameters {
    pub maximum_number_of_messages: u32,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub page: Option<u32>,
    pub include_entities: bool,
    pub custom: CustomRequestParameters,
}

impl Default for LatestMessagesSentParameters {
    fn default() -> Self {
        Self {
            maximum_number_of_messages: 40,
            since_id: None,
            max_id: None,
            page: None,
            include_entities: true,
            custom: CustomRequestParameters::default(),
        }
    }
}

impl QueryParameters for LatestMessagesSentParameters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "count", self.maximum_number_of_messages);
        push_opt(&mut pairs, "since_id", self.since_id);
        push_opt(&mut pairs, "max_id", self.max_id);
        push_opt(&mut pairs, "page", self.page);
        push_flag(&mut pairs, "include_entities", self.include_entities, true);
        pairs.extend(self.custom.query_pairs());
        pairs
    }
}
