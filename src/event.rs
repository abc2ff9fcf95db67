use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

/// The webhook payload GitHub hands the action, read from the file named by
/// `GITHUB_EVENT_PATH`. Only the fields the mirror needs are deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub issue: Option<Item>,
    #[serde(default)]
    pub pull_request: Option<Item>,
    pub repository: Repository,
}

/// The issue or pull request being mirrored.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    /// The word used in work-item titles and the disclaimer banner.
    pub fn noun(self) -> &'static str {
        match self {
            ItemKind::Issue => "issue",
            ItemKind::PullRequest => "PR",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl EventPayload {
    pub fn load() -> Result<Self> {
        let path = std::env::var("GITHUB_EVENT_PATH")
            .context("GITHUB_EVENT_PATH is not set; is this running inside a workflow?")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload from {path}"))?;
        serde_json::from_str(&contents).context("Failed to parse event payload")
    }

    /// The record that triggered the run, or None for events that carry
    /// neither an issue nor a pull request.
    pub fn item(&self) -> Option<(ItemKind, &Item)> {
        if let Some(issue) = &self.issue {
            Some((ItemKind::Issue, issue))
        } else {
            self.pull_request
                .as_ref()
                .map(|pr| (ItemKind::PullRequest, pr))
        }
    }
}
