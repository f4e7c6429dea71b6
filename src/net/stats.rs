//! Repository statistics refresh.
//!
//! Client-side (csr): real HTTP call via `gloo-net`.
//! Native builds: the fetch reports [`UiError::Unavailable`] since the
//! endpoint is only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers log and drop failures; there is no retry and nothing user-visible.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::error::UiError;

/// Counters for one repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub open_prs: u64,
}

/// Body of the refresh endpoint, keyed by project id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub github_stats: BTreeMap<String, RepoStats>,
}

/// Card counter targeted by `[data-stat="..."]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatField {
    Stars,
    Forks,
    Issues,
    Prs,
}

impl StatField {
    pub const ALL: [Self; 4] = [Self::Stars, Self::Forks, Self::Issues, Self::Prs];

    pub fn attr_value(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Issues => "issues",
            Self::Prs => "prs",
        }
    }

    pub fn selector(self) -> String {
        format!("[data-stat=\"{}\"]", self.attr_value())
    }

    fn read(self, stats: &RepoStats) -> u64 {
        match self {
            Self::Stars => stats.stars,
            Self::Forks => stats.forks,
            Self::Issues => stats.open_issues,
            Self::Prs => stats.open_prs,
        }
    }
}

/// One text replacement inside one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatUpdate {
    pub project_id: String,
    pub field: StatField,
    pub text: String,
}

/// Flatten a response into per-card text updates.
pub fn stat_updates(response: &StatsResponse) -> Vec<StatUpdate> {
    response
        .github_stats
        .iter()
        .flat_map(|(project_id, stats)| {
            StatField::ALL.into_iter().map(move |field| StatUpdate {
                project_id: project_id.clone(),
                field,
                text: field.read(stats).to_string(),
            })
        })
        .collect()
}

/// Selector for the card carrying `project_id`.
pub fn card_selector(config: &StatsConfig, project_id: &str) -> String {
    let escaped = project_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{}=\"{}\"]", config.project_id_attr, escaped)
}

/// Fetch fresh statistics from the refresh endpoint.
///
/// # Errors
///
/// Returns an error if the request cannot be sent, the status is not a
/// success, or the body does not decode.
pub async fn fetch_stats(config: &StatsConfig, csrf_token: Option<&str>) -> Result<StatsResponse, UiError> {
    #[cfg(feature = "csr")]
    {
        let mut request = gloo_net::http::Request::get(&config.endpoint).header("X-Requested-With", "XMLHttpRequest");
        if let Some(token) = csrf_token {
            request = request.header(&config.csrf_header, token);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| UiError::Request(e.to_string()))?;
        if !resp.ok() {
            return Err(UiError::Status(resp.status()));
        }
        resp.json::<StatsResponse>()
            .await
            .map_err(|e| UiError::Request(e.to_string()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, csrf_token);
        Err(UiError::Unavailable("fetch"))
    }
}
