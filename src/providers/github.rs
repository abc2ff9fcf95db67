use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use super::SourceClient;
use crate::event::{ItemKind, Repository};

pub const DEFAULT_API: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("ado-mirror/", env!("CARGO_PKG_VERSION"));

/// GitHub REST client for the two calls the mirror needs: rendering a body
/// as HTML and pushing the updated body back.
pub struct GitHubClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(DEFAULT_API, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {token}"),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SourceClient for GitHubClient {
    async fn render_markdown(&self, text: &str, context_repo: &str) -> Result<String> {
        let url = format!("{}/markdown", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({
                "text": text,
                "mode": "gfm",
                "context": context_repo,
            }))
            .send()
            .await
            .context("Markdown render request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Markdown render returned HTTP {status}");
        }

        resp.text()
            .await
            .context("Failed to read the rendered Markdown")
    }

    async fn update_body(
        &self,
        repo: &Repository,
        kind: ItemKind,
        number: u64,
        body: &str,
    ) -> Result<()> {
        let endpoint = match kind {
            ItemKind::Issue => "issues",
            ItemKind::PullRequest => "pulls",
        };
        let url = format!(
            "{}/repos/{}/{}/{endpoint}/{number}",
            self.base_url, repo.owner.login, repo.name
        );

        let resp = self
            .client
            .patch(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .with_context(|| format!("Body update request for {kind} #{number} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            bail!("Body update for {kind} #{number} returned HTTP {status}: {detail}");
        }
        Ok(())
    }
}
