#![allow(dead_code)]

use git_wrapped::{Aggregator, CacheStore, GitHubClient};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// A mocked GitHub API plus helpers to build clients against it.
pub struct TestContext {
    pub server: MockServer,
}

impl TestContext {
    pub async fn new() -> Self {
        TestContext {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self, token: Option<&str>) -> Arc<GitHubClient> {
        Arc::new(
            GitHubClient::new(
                &self.server.uri(),
                token.map(str::to_string),
                Duration::from_secs(5),
            )
            .expect("Failed to create client"),
        )
    }

    pub fn aggregator(&self, token: Option<&str>) -> Aggregator {
        self.aggregator_with_cache(token, Arc::new(CacheStore::default()))
    }

    pub fn aggregator_with_cache(&self, token: Option<&str>, cache: Arc<CacheStore>) -> Aggregator {
        Aggregator::new(self.client(token), cache)
    }

    pub async fn mock_profile(&self, login: &str, public_repos: u64, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", login)))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(login, public_repos)))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_profile_status(&self, login: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", login)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": "Not Found" })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_repos(&self, login: &str, repos: Value, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}/repos", login)))
            .respond_with(ResponseTemplate::new(200).set_body_json(repos))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_events(&self, login: &str, events: Value, expected_calls: u64) {
        self.mock_events_response(
            login,
            ResponseTemplate::new(200).set_body_json(events),
            expected_calls,
        )
        .await;
    }

    pub async fn mock_events_response(&self, login: &str, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}/events/public", login)))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_contributions(&self, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }
}

pub fn profile_json(login: &str, public_repos: u64) -> Value {
    json!({
        "login": login,
        "id": 583231,
        "avatar_url": format!("https://avatars.githubusercontent.com/{}", login),
        "bio": null,
        "public_repos": public_repos,
        "followers": 42,
        "following": 7,
        "created_at": "2016-03-01T12:00:00Z"
    })
}

pub fn repo_json(name: &str, language: Option<&str>, stars: u64, forks: u64) -> Value {
    json!({
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": null,
        "language": language,
        "stargazers_count": stars,
        "forks_count": forks
    })
}

pub fn push_event(commits: usize) -> Value {
    let commits: Vec<Value> = (0..commits)
        .map(|i| json!({ "sha": format!("{:040x}", i), "message": "wip" }))
        .collect();
    json!({ "type": "PushEvent", "payload": { "commits": commits } })
}

pub fn simple_event(kind: &str) -> Value {
    json!({ "type": kind, "payload": {} })
}

pub fn contributions_json(
    commits: u64,
    restricted: u64,
    prs: u64,
    issues: u64,
    contributed_to: u64,
    days: &[(&str, u64)],
) -> Value {
    let contribution_days: Vec<Value> = days
        .iter()
        .map(|(date, count)| json!({ "date": date, "contributionCount": count }))
        .collect();

    json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "totalCommitContributions": commits,
                    "restrictedContributionsCount": restricted,
                    "totalPullRequestContributions": prs,
                    "totalIssueContributions": issues,
                    "totalRepositoriesWithContributedCommits": contributed_to,
                    "contributionCalendar": {
                        "totalContributions": commits + restricted,
                        "weeks": [{ "contributionDays": contribution_days }]
                    }
                },
                "repositoriesContributedTo": { "totalCount": contributed_to }
            }
        }
    })
}
