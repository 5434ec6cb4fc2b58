//! The recommender seam.
//!
//! The RPC layer only knows about [`Recommender`]; the model that actually
//! computes tag weights and similar users lives behind it.

use async_trait::async_trait;

use crate::error::{RecommendError, RecommendResult};

/// One observed interaction between a user and a news tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestRecord {
    pub user_id: i32,
    pub tag_id: i32,
    pub rating: f64,
    /// Unix timestamp (seconds) of the last view.
    pub last_view_time: i64,
}

/// A computed interest weight for a user/tag pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagWeight {
    pub user_id: i32,
    pub tag_id: i32,
    pub weight: f64,
}

/// A user found similar to the queried one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserMatch {
    pub user_id: i32,
    pub score: f64,
}

/// Operations the `NewsRecommend` service delegates to.
///
/// Implementations are shared across all worker threads.
#[async_trait]
pub trait Recommender: Send + Sync + 'static {
    /// Computes per user/tag weights from raw interaction records.
    async fn weights(&self, records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>>;

    /// Retrains the model on the given records and returns the updated weights.
    async fn train(&self, records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>>;

    /// Tag ids recommended for `user_id` (user-based collaborative filtering), best first.
    async fn recommend_tags(&self, user_id: i32, limit: usize) -> RecommendResult<Vec<i32>>;

    /// Users similar to `user_id` (item-based collaborative filtering), best first.
    async fn similar_users(&self, user_id: i32, limit: usize) -> RecommendResult<Vec<UserMatch>>;
}

/// Placeholder used when no model is wired in. Every call reports `Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecommender;

const NO_MODEL: &str = "no recommendation model is attached to this server";

#[async_trait]
impl Recommender for UnavailableRecommender {
    async fn weights(&self, _records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>> {
        Err(RecommendError::Unavailable(NO_MODEL))
    }

    async fn train(&self, _records: Vec<InterestRecord>) -> RecommendResult<Vec<TagWeight>> {
        Err(RecommendError::Unavailable(NO_MODEL))
    }

    async fn recommend_tags(&self, _user_id: i32, _limit: usize) -> RecommendResult<Vec<i32>> {
        Err(RecommendError::Unavailable(NO_MODEL))
    }

    async fn similar_users(&self, _user_id: i32, _limit: usize) -> RecommendResult<Vec<UserMatch>> {
        Err(RecommendError::Unavailable(NO_MODEL))
    }
}
