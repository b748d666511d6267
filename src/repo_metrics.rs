//! Derived metrics over the fetched repository list: star and fork totals,
//! the language distribution and the most-starred repositories.
//!
//! Languages are counted per repository, not per line of code.

use crate::models::{LanguageShare, TopRepo};
use crate::types::GitHubRepo;
use std::collections::HashMap;

pub const MAX_TOP_LANGUAGES: usize = 5;
pub const MAX_TOP_REPOS: usize = 3;
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryMetrics {
    pub repository_count: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub top_languages: Vec<LanguageShare>,
    pub most_used_language: String,
    pub top_repos: Vec<TopRepo>,
}

pub fn summarize_repositories(repos: &[GitHubRepo]) -> RepositoryMetrics {
    let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
    let total_forks = repos.iter().map(|r| r.forks_count).sum();

    let top_languages = language_distribution(repos);
    let most_used_language = top_languages
        .first()
        .map(|lang| lang.name.clone())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    RepositoryMetrics {
        repository_count: repos.len() as u64,
        total_stars,
        total_forks,
        top_languages,
        most_used_language,
        top_repos: top_repositories(repos),
    }
}

/// Share of repositories per declared language, highest first, capped at
/// [`MAX_TOP_LANGUAGES`]. Equal shares keep first-seen order.
pub fn language_distribution(repos: &[GitHubRepo]) -> Vec<LanguageShare> {
    let mut counts: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for language in repos.iter().filter_map(GitHubRepo::declared_language) {
        match index.get(language) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(language, counts.len());
                counts.push((language, 1));
            }
        }
    }

    let with_language: u64 = counts.iter().map(|(_, count)| count).sum();
    if with_language == 0 {
        return Vec::new();
    }

    // Stable sort
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_TOP_LANGUAGES)
        .map(|(name, count)| LanguageShare {
            name: name.to_string(),
            percentage: (count * 100) as f64 / with_language as f64,
        })
        .collect()
}

/// The most-starred repositories, ties in upstream order.
pub fn top_repositories(repos: &[GitHubRepo]) -> Vec<TopRepo> {
    let mut ranked: Vec<&GitHubRepo> = repos.iter().collect();
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    ranked
        .into_iter()
        .take(MAX_TOP_REPOS)
        .map(|repo| TopRepo {
            name: repo.name.clone(),
            stars: repo.stargazers_count,
            description: repo.description.clone(),
            language: repo.declared_language().unwrap_or_default().to_string(),
        })
        .collect()
}
