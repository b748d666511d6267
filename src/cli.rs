use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::github::DEFAULT_API_BASE_URL;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "git-wrapped")]
#[command(about = "git-wrapped - Serves a GitHub user's year in review as JSON and shareable cards")]
#[command(version)]
pub struct Cli {
    /// GitHub token; enables exact contribution counts
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds an aggregated record stays fresh
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl_secs: u64,

    /// Maximum number of usernames kept in the cache
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,

    /// Timeout for each upstream request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Cli {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
