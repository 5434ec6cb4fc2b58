// Rust code generated from proto/newsrecommend.proto by tonic_build.
// The proto package is "newsrecommend", so the generated items live in a module of the same name.

pub mod newsrecommend {
    tonic::include_proto!("newsrecommend");
}

pub use newsrecommend::news_recommend_client::NewsRecommendClient;
pub use newsrecommend::news_recommend_server::{NewsRecommend, NewsRecommendServer};

use newsrec_core::recommend;

impl From<recommend::InterestRecord> for newsrecommend::InterestRecord {
    fn from(r: recommend::InterestRecord) -> Self {
        newsrecommend::InterestRecord {
            user_id: r.user_id,
            tag_id: r.tag_id,
            rating: r.rating,
            last_view_time: r.last_view_time,
        }
    }
}

impl From<newsrecommend::InterestRecord> for recommend::InterestRecord {
    fn from(r: newsrecommend::InterestRecord) -> Self {
        recommend::InterestRecord {
            user_id: r.user_id,
            tag_id: r.tag_id,
            rating: r.rating,
            last_view_time: r.last_view_time,
        }
    }
}

impl From<recommend::TagWeight> for newsrecommend::TagWeight {
    fn from(w: recommend::TagWeight) -> Self {
        newsrecommend::TagWeight {
            user_id: w.user_id,
            tag_id: w.tag_id,
            weight: w.weight,
        }
    }
}

impl From<newsrecommend::TagWeight> for recommend::TagWeight {
    fn from(w: newsrecommend::TagWeight) -> Self {
        recommend::TagWeight {
            user_id: w.user_id,
            tag_id: w.tag_id,
            weight: w.weight,
        }
    }
}

impl From<recommend::UserMatch> for newsrecommend::UserScore {
    fn from(m: recommend::UserMatch) -> Self {
        newsrecommend::UserScore {
            user_id: m.user_id,
            score: m.score,
        }
    }
}

impl From<newsrecommend::UserScore> for recommend::UserMatch {
    fn from(s: newsrecommend::UserScore) -> Self {
        recommend::UserMatch {
            user_id: s.user_id,
            score: s.score,
        }
    }
}
