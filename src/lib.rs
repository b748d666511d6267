pub mod aggregator;
pub mod api;
pub mod cache;
pub mod card;
pub mod cli;
pub mod contributions;
pub mod error;
pub mod github;
pub mod health;
pub mod models;
pub mod repo_metrics;
pub mod types;

pub use aggregator::Aggregator;
pub use cache::CacheStore;
pub use error::{Result, WrappedError};
pub use github::GitHubClient;
pub use models::StatsRecord;
