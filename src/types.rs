use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// GitHub REST response structures. Absent or null fields fall back to
// empty strings and zero counts.

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubProfile {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default)]
    pub public_repos: u64,
    /// Only reported when the credential belongs to the profile owner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_private_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

impl GitHubRepo {
    /// The declared primary language, treating an empty string as undeclared.
    pub fn declared_language(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub commits: Vec<serde_json::Value>,
}

// GraphQL contributions query

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ContributionsData {
    pub user: Option<ContributionsUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsUser {
    pub contributions_collection: Option<ContributionsCollection>,
    #[serde(default)]
    pub repositories_contributed_to: Option<TotalCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    #[serde(default)]
    pub total_commit_contributions: u64,
    #[serde(default)]
    pub restricted_contributions_count: u64,
    #[serde(default)]
    pub total_pull_request_contributions: u64,
    #[serde(default)]
    pub total_issue_contributions: u64,
    #[serde(default)]
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    #[serde(default)]
    pub total_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContributionCalendar {
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub contribution_count: u64,
    pub date: NaiveDate,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
