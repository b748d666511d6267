use serde::{Deserialize, Serialize};

/// Year-in-review statistics for one GitHub user.
///
/// Activity counts may be exact (from the contributions API) or estimated
/// (from the public events feed and the per-repository floor); the record
/// itself does not say which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub username: String,
    pub avatar: String,
    pub bio: String,
    pub total_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub followers: u64,
    pub following: u64,
    pub contributed_to: u64,
    pub total_commits: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    pub total_issues: u64,
    pub account_age: u64,
    pub coding_velocity: u64,
    pub lines_of_code: u64,
    pub most_active_day: String,
    pub most_used_language: String,
    pub top_languages: Vec<LanguageShare>,
    pub top_repos: Vec<TopRepo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRepo {
    pub name: String,
    pub stars: u64,
    pub description: String,
    pub language: String,
}

/// Where the final contribution counts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionProvenance {
    /// Exact counts from the authenticated contributions API.
    Contributions,
    /// Counted from the public events feed, then raised to the floor estimate.
    EventsEstimate,
}

/// Activity counts produced by the contribution providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionTally {
    pub commits: u64,
    pub pull_requests: u64,
    pub issues: u64,
    pub contributed_to: u64,
    pub most_active_day: String,
    pub provenance: ContributionProvenance,
}

impl Default for ContributionTally {
    fn default() -> Self {
        Self {
            commits: 0,
            pull_requests: 0,
            issues: 0,
            contributed_to: 0,
            most_active_day: String::new(),
            provenance: ContributionProvenance::EventsEstimate,
        }
    }
}

impl ContributionTally {
    /// Adds another tally's counters into this one, keeping the first
    /// non-empty most-active-day and the larger contributed-to count.
    pub fn absorb(&mut self, other: ContributionTally) {
        self.commits += other.commits;
        self.pull_requests += other.pull_requests;
        self.issues += other.issues;
        self.contributed_to = self.contributed_to.max(other.contributed_to);
        if self.most_active_day.is_empty() {
            self.most_active_day = other.most_active_day;
        }
    }
}
