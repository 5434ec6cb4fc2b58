//! Typed helpers for callers of the `NewsRecommend` service.

use newsrec_core::{InterestRecord, TagWeight, UserMatch};
use thiserror::Error;
use tonic::transport::Channel;
use tracing::{debug, info};

use crate::grpc_api::newsrecommend::{
    GetWeightRequest, ItemCfRequest, TrainModelRequest, UserCfRequest,
};
use crate::grpc_api::NewsRecommendClient;

pub type RecommendClient = NewsRecommendClient<Channel>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to connect to recommend server: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("Recommend RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Connects to `addr`, which may be `host:port` or a full `http://` URI.
pub async fn connect(addr: &str) -> ClientResult<RecommendClient> {
    let uri = if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    };
    debug!(%uri, "Connecting to recommend server");
    Ok(NewsRecommendClient::connect(uri).await?)
}

pub async fn get_weight(
    client: &mut RecommendClient,
    records: Vec<InterestRecord>,
) -> ClientResult<Vec<TagWeight>> {
    for r in &records {
        info!(
            "GetWeight user_id: {} - tag_id: {} - rating: {} - time: {}",
            r.user_id, r.tag_id, r.rating, r.last_view_time
        );
    }
    let request = GetWeightRequest {
        request: records.into_iter().map(Into::into).collect(),
    };
    let response = client.get_weight(request).await?.into_inner();
    Ok(response.response.into_iter().map(Into::into).collect())
}

pub async fn train_model(
    client: &mut RecommendClient,
    records: Vec<InterestRecord>,
) -> ClientResult<Vec<TagWeight>> {
    info!(records = records.len(), "Sending TrainModel");
    let request = TrainModelRequest {
        data: records.into_iter().map(Into::into).collect(),
    };
    let response = client.train_model(request).await?.into_inner();
    Ok(response.data.into_iter().map(Into::into).collect())
}

/// A `limit` of 0 lets the server pick its default.
pub async fn get_recommend_tags(
    client: &mut RecommendClient,
    user_id: i32,
    limit: i32,
) -> ClientResult<Vec<i32>> {
    let request = UserCfRequest { user_id, limit };
    info!(?request, "Sending GetRecommendTags");
    Ok(client.get_recommend_tags(request).await?.into_inner().tag_ids)
}

/// A `limit` of 0 lets the server pick its default.
pub async fn get_recommend_users(
    client: &mut RecommendClient,
    user_id: i32,
    limit: i32,
) -> ClientResult<Vec<UserMatch>> {
    let request = ItemCfRequest { user_id, limit };
    info!(?request, "Sending GetRecommendUsers");
    let response = client.get_recommend_users(request).await?.into_inner();
    Ok(response.users.into_iter().map(Into::into).collect())
}
