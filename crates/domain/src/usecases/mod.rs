//! Application use cases / business logic

pub mod recommend;

pub use recommend::{RecommendConfig, RecommendSource, RecommendUseCase};
