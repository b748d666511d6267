use crate::cache::CacheStore;
use crate::contributions::ContributionChain;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{ContributionTally, StatsRecord};
use crate::repo_metrics::{summarize_repositories, RepositoryMetrics};
use crate::types::GitHubProfile;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Rough lines of code credited per commit.
pub const LINES_PER_COMMIT: u64 = 50;
const DAYS_PER_YEAR: i64 = 365;

/// Builds [`StatsRecord`]s from GitHub, serving repeat requests from the cache.
///
/// Only the profile and repository fetches can fail an aggregation. Concurrent
/// requests for the same username share one fetch through the cache, success
/// or failure.
pub struct Aggregator {
    client: Arc<GitHubClient>,
    contributions: ContributionChain,
    cache: Arc<CacheStore>,
}

impl Aggregator {
    pub fn new(client: Arc<GitHubClient>, cache: Arc<CacheStore>) -> Self {
        let contributions = ContributionChain::for_client(client.clone());
        Self::with_contributions(client, cache, contributions)
    }

    pub fn with_contributions(
        client: Arc<GitHubClient>,
        cache: Arc<CacheStore>,
        contributions: ContributionChain,
    ) -> Self {
        Self {
            client,
            contributions,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Whether exact contribution counts can be requested.
    pub fn has_token(&self) -> bool {
        self.client.has_token()
    }

    /// Returns the statistics for `username`, which must already be a
    /// well-formed login.
    pub async fn aggregate(&self, username: &str) -> Result<StatsRecord> {
        if let Some(record) = self.cache.get(username).await {
            debug!(username, "Serving cached record");
            return Ok(record);
        }

        self.cache
            .get_or_fetch(username, self.fetch_record(username))
            .await
    }

    async fn fetch_record(&self, username: &str) -> Result<StatsRecord> {
        info!(username, "Aggregating GitHub activity");

        let (profile, repos) = tokio::join!(
            self.client.fetch_profile(username),
            self.client.fetch_repositories(username)
        );
        // A missing profile wins over any repository error.
        let profile = profile?;
        let repos = repos?;

        let metrics = summarize_repositories(&repos);
        let tally = self
            .contributions
            .resolve(username, metrics.repository_count)
            .await;
        debug!(username, provenance = ?tally.provenance, commits = tally.commits, "Resolved contributions");

        let record = assemble_record(&profile, metrics, tally, Utc::now());
        info!(
            username,
            repos = record.total_repos,
            commits = record.total_commits,
            "Aggregation complete"
        );
        Ok(record)
    }
}

/// Merges fetched data into the final record and computes the synthetic metrics.
pub fn assemble_record(
    profile: &GitHubProfile,
    metrics: RepositoryMetrics,
    tally: ContributionTally,
    now: DateTime<Utc>,
) -> StatsRecord {
    let total_repos = profile.public_repos + profile.total_private_repos;
    let coding_velocity = if total_repos > 0 {
        (tally.commits as f64 / total_repos as f64).round() as u64
    } else {
        0
    };

    StatsRecord {
        username: profile.login.clone(),
        avatar: profile.avatar_url.clone(),
        bio: profile.bio.clone(),
        total_repos,
        total_stars: metrics.total_stars,
        total_forks: metrics.total_forks,
        followers: profile.followers,
        following: profile.following,
        contributed_to: tally.contributed_to,
        total_commits: tally.commits,
        total_prs: tally.pull_requests,
        total_issues: tally.issues,
        account_age: account_age_years(profile.created_at, now),
        coding_velocity,
        lines_of_code: tally.commits.saturating_mul(LINES_PER_COMMIT),
        most_active_day: tally.most_active_day,
        most_used_language: metrics.most_used_language,
        top_languages: metrics.top_languages,
        top_repos: metrics.top_repos,
    }
}

/// Whole 365-day years between account creation and `now`.
pub fn account_age_years(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let days = (now - created_at).num_days().max(0);
    (days / DAYS_PER_YEAR) as u64
}
