use std::sync::Arc;

use ferrous_container::{DiResult, Resolver};

use super::{ListIdentifier, QueryPairs, QueryParameters, TweetsFromListParameters};

/// A list identifier paired with the paging parameters for its tweets.
#[derive(Debug, Clone)]
pub struct TweetsFromListQuery {
    list: Arc<ListIdentifier>,
    parameters: Arc<TweetsFromListParameters>,
}

impl TweetsFromListQuery {
    pub fn new(list: Arc<ListIdentifier>, parameters: Arc<TweetsFromListParameters>) -> Self {
        Self { list, parameters }
    }

    pub(crate) fn resolve<R: Resolver + ?Sized>(r: &R) -> DiResult<Self> {
        Ok(Self::new(
            r.get::<ListIdentifier>()?,
            r.get::<TweetsFromListParameters>()?,
        ))
    }

    pub fn list(&self) -> &ListIdentifier {
        &self.list
    }

    pub fn parameters(&self) -> &TweetsFromListParameters {
        &self.parameters
    }
}

impl QueryParameters for TweetsFromListQuery {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.list.query_pairs();
        pairs.extend(self.parameters.query_pairs());
        pairs
    }
}
