// This module contains the gRPC service implementations.

pub mod news_recommend_service;

// Re-export the service implementation struct for easier access from server.rs
pub use news_recommend_service::NewsRecommendServerImpl;
