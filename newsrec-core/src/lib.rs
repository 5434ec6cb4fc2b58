pub mod config;
pub mod error;
pub mod recommend;

// Re-export key types/traits for easier use
pub use config::{ConfigLoader, ServerConfig};
pub use error::{ConfigError, ConfigResult, RecommendError, RecommendResult};
pub use recommend::{InterestRecord, Recommender, TagWeight, UnavailableRecommender, UserMatch};
