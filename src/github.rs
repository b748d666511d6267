use crate::error::{Result, WrappedError};
use crate::types::{
    ContributionsData, ContributionsUser, GitHubEvent, GitHubProfile, GitHubRepo, GraphQlRequest,
    GraphQlResponse,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;
const LOW_RATE_LIMIT: u32 = 10;

const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      totalCommitContributions
      restrictedContributionsCount
      totalPullRequestContributions
      totalIssueContributions
      totalRepositoriesWithContributedCommits
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
    repositoriesContributedTo(first: 100, contributionTypes: [COMMIT, PULL_REQUEST, ISSUE]) {
      totalCount
    }
  }
}
"#;

/// Thin client over the GitHub REST and GraphQL endpoints used for aggregation.
///
/// Requests are attempted once. Failures are classified and returned; callers
/// decide which ones are fatal.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| WrappedError::ConfigError(format!("Invalid API base URL {}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("git-wrapped/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(GitHubClient {
            client,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Whether a credential is configured, enabling the contributions API.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| WrappedError::ConfigError(format!("Invalid endpoint path {}: {}", path, e)))
    }

    async fn send_get(&self, url: Url) -> Result<Response> {
        debug!(%url, "GET");
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if let Some(remaining) = rate_limit_remaining(&response) {
            if remaining < LOW_RATE_LIMIT {
                warn!(remaining, "GitHub rate limit running low");
            }
        }
        Ok(response)
    }

    async fn error_for_status(response: Response, what: &str) -> WrappedError {
        let status = response.status();
        if status == StatusCode::FORBIDDEN && rate_limit_remaining(&response) == Some(0) {
            return WrappedError::RateLimitExceeded(format!("GitHub API rate limit exceeded while fetching {}", what));
        }
        let error_text = response.text().await.unwrap_or_default();
        WrappedError::UpstreamError(format!("Fetching {} failed with status {}: {}", what, status, error_text))
    }

    /// `GET /users/{username}`. Any client error other than rate limiting means
    /// the account does not exist for our purposes.
    pub async fn fetch_profile(&self, username: &str) -> Result<GitHubProfile> {
        let url = self.endpoint(&format!("users/{}", username))?;
        let response = self.send_get(url).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }
        if status.is_client_error() && rate_limit_remaining(&response) != Some(0) {
            return Err(WrappedError::NotFound(username.to_string()));
        }
        Err(Self::error_for_status(response, "profile").await)
    }

    /// `GET /users/{username}/repos`, first page of every repository type, most
    /// recently updated first.
    pub async fn fetch_repositories(&self, username: &str) -> Result<Vec<GitHubRepo>> {
        let mut url = self.endpoint(&format!("users/{}/repos", username))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("sort", "updated")
            .append_pair("type", "all");

        let response = self.send_get(url).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response, "repositories").await);
        }
        Ok(response.json().await?)
    }

    /// `GET /users/{username}/events/public`, the most recent page only.
    pub async fn fetch_public_events(&self, username: &str) -> Result<Vec<GitHubEvent>> {
        let mut url = self.endpoint(&format!("users/{}/events/public", username))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let response = self.send_get(url).await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response, "public events").await);
        }
        Ok(response.json().await?)
    }

    /// Runs the contributions GraphQL query. Returns `Ok(None)` when the
    /// response carries no user.
    pub async fn fetch_contributions(&self, username: &str) -> Result<Option<ContributionsUser>> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| WrappedError::ConfigError("Contributions query requires a GitHub token".to_string()))?;
        let url = self.endpoint("graphql")?;

        let body = GraphQlRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: json!({ "username": username }),
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response, "contributions").await);
        }

        let parsed: GraphQlResponse<ContributionsData> = response.json().await?;
        let user = parsed.data.and_then(|d| d.user);
        match parsed.errors {
            Some(errors) if !errors.is_empty() && user.is_none() => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                Err(WrappedError::UpstreamError(format!(
                    "Contributions query reported errors: {}",
                    messages.join("; ")
                )))
            }
            _ => Ok(user),
        }
    }
}

fn rate_limit_remaining(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
}
