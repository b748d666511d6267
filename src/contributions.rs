//! Contribution counts for a user, gathered from an ordered list of sources.
//!
//! Each source reports `Found`, `Empty` or `Failed`. The chain stops at the
//! first `Found`; `Empty` results still contribute their partial counts and
//! failures are logged and skipped. A source that fetched zero commits and a
//! source that failed are treated alike. Unless the authenticated
//! contributions API produced the result, the commit count is raised to a
//! per-repository floor so accounts without recent public activity still get
//! a plausible figure.

use crate::error::WrappedError;
use crate::github::GitHubClient;
use crate::models::{ContributionProvenance, ContributionTally};
use crate::types::{ContributionCalendar, ContributionsUser, GitHubEvent};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Commits assumed per fetched repository when estimating.
pub const FLOOR_COMMITS_PER_REPO: u64 = 8;

const PUSH_EVENT: &str = "PushEvent";
const PULL_REQUEST_EVENT: &str = "PullRequestEvent";
const ISSUES_EVENT: &str = "IssuesEvent";

#[derive(Debug)]
pub enum ProviderOutcome {
    /// The source produced a usable commit count.
    Found(ContributionTally),
    /// The source answered but reported no commits. Other counters may be set.
    Empty(ContributionTally),
    /// The source could not be queried.
    Failed(WrappedError),
}

impl ProviderOutcome {
    fn from_tally(tally: ContributionTally) -> Self {
        if tally.commits > 0 {
            ProviderOutcome::Found(tally)
        } else {
            ProviderOutcome::Empty(tally)
        }
    }
}

pub trait ContributionSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch<'a>(&'a self, username: &'a str) -> BoxFuture<'a, ProviderOutcome>;
}

/// Authenticated GraphQL contributions collection. Exact counts plus the
/// daily calendar.
pub struct ContributionsApiSource {
    client: Arc<GitHubClient>,
}

impl ContributionsApiSource {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

impl ContributionSource for ContributionsApiSource {
    fn name(&self) -> &'static str {
        "contributions_api"
    }

    fn fetch<'a>(&'a self, username: &'a str) -> BoxFuture<'a, ProviderOutcome> {
        async move {
            match self.client.fetch_contributions(username).await {
                Ok(Some(user)) => ProviderOutcome::from_tally(tally_from_contributions(user)),
                Ok(None) => ProviderOutcome::Empty(ContributionTally::default()),
                Err(e) => ProviderOutcome::Failed(e),
            }
        }
        .boxed()
    }
}

/// Public events feed, the last 100 events at most.
pub struct PublicEventsSource {
    client: Arc<GitHubClient>,
}

impl PublicEventsSource {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

impl ContributionSource for PublicEventsSource {
    fn name(&self) -> &'static str {
        "public_events"
    }

    fn fetch<'a>(&'a self, username: &'a str) -> BoxFuture<'a, ProviderOutcome> {
        async move {
            match self.client.fetch_public_events(username).await {
                Ok(events) => ProviderOutcome::from_tally(tally_from_events(&events)),
                Err(e) => ProviderOutcome::Failed(e),
            }
        }
        .boxed()
    }
}

pub struct ContributionChain {
    sources: Vec<Box<dyn ContributionSource>>,
}

impl ContributionChain {
    pub fn new(sources: Vec<Box<dyn ContributionSource>>) -> Self {
        Self { sources }
    }

    /// The standard chain: the contributions API when a token is configured,
    /// then the public events feed.
    pub fn for_client(client: Arc<GitHubClient>) -> Self {
        let mut sources: Vec<Box<dyn ContributionSource>> = Vec::new();
        if client.has_token() {
            sources.push(Box::new(ContributionsApiSource::new(client.clone())));
        } else {
            debug!("No GitHub token configured, contributions API disabled");
        }
        sources.push(Box::new(PublicEventsSource::new(client)));
        Self::new(sources)
    }

    pub async fn resolve(&self, username: &str, repository_count: u64) -> ContributionTally {
        let mut tally = ContributionTally::default();

        for source in &self.sources {
            match source.fetch(username).await {
                ProviderOutcome::Found(found) => {
                    debug!(username, source = source.name(), commits = found.commits, "Contribution source found commits");
                    let provenance = found.provenance;
                    tally.absorb(found);
                    tally.provenance = provenance;
                    break;
                }
                ProviderOutcome::Empty(partial) => {
                    debug!(username, source = source.name(), "Contribution source reported no commits");
                    tally.absorb(partial);
                }
                ProviderOutcome::Failed(e) => {
                    warn!(username, source = source.name(), error = %e, "Contribution source failed, falling back");
                }
            }
        }

        if tally.provenance == ContributionProvenance::EventsEstimate {
            let floor = repository_count.saturating_mul(FLOOR_COMMITS_PER_REPO);
            if tally.commits < floor {
                info!(username, counted = tally.commits, floor, "Raising commit count to estimate floor");
                tally.commits = floor;
            }
        }

        tally
    }
}

pub fn tally_from_contributions(user: ContributionsUser) -> ContributionTally {
    let contributed_to = user
        .repositories_contributed_to
        .map(|r| r.total_count)
        .unwrap_or(0);

    let Some(collection) = user.contributions_collection else {
        return ContributionTally {
            contributed_to,
            ..ContributionTally::default()
        };
    };

    ContributionTally {
        commits: collection.total_commit_contributions + collection.restricted_contributions_count,
        pull_requests: collection.total_pull_request_contributions,
        issues: collection.total_issue_contributions,
        contributed_to,
        most_active_day: collection
            .contribution_calendar
            .as_ref()
            .map(most_active_day)
            .unwrap_or_default(),
        provenance: ContributionProvenance::Contributions,
    }
}

pub fn tally_from_events(events: &[GitHubEvent]) -> ContributionTally {
    let mut tally = ContributionTally::default();
    for event in events {
        match event.kind.as_str() {
            PUSH_EVENT => tally.commits += event.payload.commits.len() as u64,
            PULL_REQUEST_EVENT => tally.pull_requests += 1,
            ISSUES_EVENT => tally.issues += 1,
            _ => {}
        }
    }
    tally
}

/// Label (`Mar 5`) of the first day holding the highest contribution count,
/// or an empty string when no day has any contributions.
pub fn most_active_day(calendar: &ContributionCalendar) -> String {
    let mut best: Option<(u64, chrono::NaiveDate)> = None;
    for day in calendar.weeks.iter().flat_map(|w| &w.contribution_days) {
        let current_max = best.map(|(count, _)| count).unwrap_or(0);
        if day.contribution_count > current_max {
            best = Some((day.contribution_count, day.date));
        }
    }

    best.map(|(_, date)| date.format("%b %-d").to_string())
        .unwrap_or_default()
}
