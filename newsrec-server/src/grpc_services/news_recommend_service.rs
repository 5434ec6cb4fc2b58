use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, info};

use newsrec_core::recommend::{self, Recommender};

use crate::error::status_from_recommend_error;
use crate::grpc_api::newsrecommend::{
    GetWeightRequest, GetWeightResponse, InterestRecord, ItemCfRequest, ItemCfResponse,
    TrainModelRequest, TrainModelResponse, UserCfRequest, UserCfResponse,
};
use crate::grpc_api::NewsRecommend;

/// Tag lookups return this many ids when the caller sends no positive limit.
pub const DEFAULT_TAG_LIMIT: usize = 20;
/// User lookups return this many matches when the caller sends no positive limit.
pub const DEFAULT_USER_LIMIT: usize = 10;

// Helper to validate wire records before they reach the recommender
fn records_from_proto(records: Vec<InterestRecord>) -> Result<Vec<recommend::InterestRecord>, Status> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            if r.user_id < 0 || r.tag_id < 0 {
                return Err(Status::invalid_argument(format!(
                    "Record {}: user_id and tag_id must be non-negative (got {}, {})",
                    i, r.user_id, r.tag_id
                )));
            }
            if !r.rating.is_finite() {
                return Err(Status::invalid_argument(format!(
                    "Record {}: rating must be a finite number",
                    i
                )));
            }
            Ok(r.into())
        })
        .collect()
}

fn check_user_id(user_id: i32) -> Result<(), Status> {
    if user_id < 0 {
        return Err(Status::invalid_argument(format!(
            "user_id must be non-negative (got {})",
            user_id
        )));
    }
    Ok(())
}

fn effective_limit(limit: i32, default: usize) -> usize {
    if limit > 0 {
        limit as usize
    } else {
        default
    }
}

/// `NewsRecommend` servicer delegating to a [`Recommender`].
#[derive(Debug)]
pub struct NewsRecommendServerImpl<R> {
    pub recommender: Arc<R>,
}

impl<R> NewsRecommendServerImpl<R> {
    pub fn new(recommender: Arc<R>) -> Self {
        NewsRecommendServerImpl { recommender }
    }
}

#[tonic::async_trait]
impl<R: Recommender> NewsRecommend for NewsRecommendServerImpl<R> {
    async fn get_weight(
        &self,
        request: Request<GetWeightRequest>,
    ) -> Result<Response<GetWeightResponse>, Status> {
        let req_inner = request.into_inner();
        for r in &req_inner.request {
            info!(
                user_id = r.user_id,
                tag_id = r.tag_id,
                rating = r.rating,
                last_view_time = r.last_view_time,
                "RPC: GetWeight record"
            );
        }

        let records = records_from_proto(req_inner.request)?;
        let weights = self
            .recommender
            .weights(records)
            .await
            .map_err(status_from_recommend_error)?;

        Ok(Response::new(GetWeightResponse {
            response: weights.into_iter().map(Into::into).collect(),
        }))
    }

    async fn train_model(
        &self,
        request: Request<TrainModelRequest>,
    ) -> Result<Response<TrainModelResponse>, Status> {
        let req_inner = request.into_inner();
        info!(records = req_inner.data.len(), "RPC: TrainModel received");

        let records = records_from_proto(req_inner.data)?;
        let weights = self
            .recommender
            .train(records)
            .await
            .map_err(status_from_recommend_error)?;

        info!(weights = weights.len(), "TrainModel finished");
        Ok(Response::new(TrainModelResponse {
            data: weights.into_iter().map(Into::into).collect(),
        }))
    }

    async fn get_recommend_tags(
        &self,
        request: Request<UserCfRequest>,
    ) -> Result<Response<UserCfResponse>, Status> {
        let req_inner = request.into_inner();
        info!(user_id = req_inner.user_id, limit = req_inner.limit, "RPC: GetRecommendTags received");

        check_user_id(req_inner.user_id)?;
        let limit = effective_limit(req_inner.limit, DEFAULT_TAG_LIMIT);
        let mut tag_ids = self
            .recommender
            .recommend_tags(req_inner.user_id, limit)
            .await
            .map_err(status_from_recommend_error)?;
        tag_ids.truncate(limit);

        debug!(user_id = req_inner.user_id, count = tag_ids.len(), "Recommended tags");
        Ok(Response::new(UserCfResponse { tag_ids }))
    }

    async fn get_recommend_users(
        &self,
        request: Request<ItemCfRequest>,
    ) -> Result<Response<ItemCfResponse>, Status> {
        let req_inner = request.into_inner();
        info!(user_id = req_inner.user_id, limit = req_inner.limit, "RPC: GetRecommendUsers received");

        check_user_id(req_inner.user_id)?;
        let limit = effective_limit(req_inner.limit, DEFAULT_USER_LIMIT);
        let mut users = self
            .recommender
            .similar_users(req_inner.user_id, limit)
            .await
            .map_err(status_from_recommend_error)?;
        users.truncate(limit);

        debug!(user_id = req_inner.user_id, count = users.len(), "Recommended users");
        Ok(Response::new(ItemCfResponse {
            users: users.into_iter().map(Into::into).collect(),
        }))
    }
}
