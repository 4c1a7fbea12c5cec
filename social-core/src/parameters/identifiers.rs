use std::fmt;

use super::{push, push_opt, QueryParameters, QueryPairs};

/// Identifies a tweet by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetIdentifier {
    pub id: Option<u64>,
}

impl TweetIdentifier {
    pub fn new(id: u64) -> Self {
        Self { id: Some(id) }
    }
}

impl QueryParameters for TweetIdentifier {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "id", self.id);
        pairs
    }
}

/// Identifies a user by id or screen name; the id wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentifier {
    pub id: Option<u64>,
    pub screen_name: Option<String>,
}

impl UserIdentifier {
    pub fn from_id(id: u64) -> Self {
        Self {
            id: Some(id),
            screen_name: None,
        }
    }

    pub fn from_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            id: None,
            screen_name: Some(screen_name.into()),
        }
    }
}

impl QueryParameters for UserIdentifier {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        match (&self.id, &self.screen_name) {
            (Some(id), _) => push(&mut pairs, "user_id", id),
            (None, Some(name)) => push(&mut pairs, "screen_name", name),
            (None, None) => {}
        }
        pairs
    }
}

/// Identifies a list by id, or by slug plus owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIdentifier {
    pub list_id: Option<u64>,
    pub slug: Option<String>,
    pub owner: UserIdentifier,
}

impl ListIdentifier {
    pub fn from_id(list_id: u64) -> Self {
        Self {
            list_id: Some(list_id),
            ..Self::default()
        }
    }

    pub fn from_slug(slug: impl Into<String>, owner: UserIdentifier) -> Self {
        Self {
            list_id: None,
            slug: Some(slug.into()),
            owner,
        }
    }
}

impl QueryParameters for ListIdentifier {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(id) = self.list_id {
            push(&mut pairs, "list_id", id);
            return pairs;
        }
        if let Some(slug) = &self.slug {
            push(&mut pairs, "slug", slug);
            match (&self.owner.id, &self.owner.screen_name) {
                (Some(id), _) => push(&mut pairs, "owner_id", id),
                (None, Some(name)) => push(&mut pairs, "owner_screen_name", name),
                (None, None) => {}
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMeasure {
    #[default]
    Kilometers,
    Miles,
}

impl fmt::Display for DistanceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMeasure::Kilometers => f.write_str("km"),
            DistanceMeasure::Miles => f.write_str("mi"),
        }
    }
}

/// A point and a radius around it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCode {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub measure: DistanceMeasure,
}

impl GeoCode {
    pub fn new(latitude: f64, longitude: f64, radius: f64, measure: DistanceMeasure) -> Self {
        Self {
            latitude,
            longitude,
            radius,
            measure,
        }
    }
}

/// `latitude,longitude,radius` with the unit appended to the radius.
impl fmt::Display for GeoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}{}", self.latitude, self.longitude, self.radius, self.measure)
    }
}

impl QueryParameters for GeoCode {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if self.radius > 0.0 {
            push(&mut pairs, "geocode", self);
        }
        pairs
    }
}
