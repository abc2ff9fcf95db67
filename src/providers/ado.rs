use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::TrackerClient;

pub const DEFAULT_HOST: &str = "https://dev.azure.com";

const API_VERSION: &str = "7.1";

/// The edit URL for an existing work item, used for hierarchy relations.
pub fn work_item_edit_url(organization: &str, id: &str) -> String {
    format!(
        "{DEFAULT_HOST}/{}/_workitems/edit/{}",
        urlencoding::encode(organization),
        urlencoding::encode(id)
    )
}

/// A single JSON-patch instruction in a work-item creation request.
#[derive(Debug, Clone, Serialize)]
pub struct PatchOperation {
    pub op: Op,
    pub path: String,
    pub value: serde_json::Value,
}

/// Work-item creation only ever adds fields and relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Add,
}

/// Ordered list of patch operations, serialized as the bare JSON array the
/// work-item API expects.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PatchDocument {
    ops: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field value, e.g. `/fields/System.Title`.
    pub fn field(mut self, path: &str, value: impl Into<String>) -> Self {
        self.ops.push(PatchOperation {
            op: Op::Add,
            path: path.to_string(),
            value: serde_json::Value::String(value.into()),
        });
        self
    }

    /// Adds a relation such as a `Hyperlink` to the original item.
    pub fn relation(mut self, rel: &str, url: &str) -> Self {
        self.ops.push(PatchOperation {
            op: Op::Add,
            path: "/relations/-".to_string(),
            value: serde_json::json!({ "rel": rel, "url": url }),
        });
        self
    }

    /// Adds a relation carrying a comment attribute, e.g. a
    /// `System.LinkTypes.Hierarchy-Reverse` link to a parent work item.
    pub fn relation_with_comment(mut self, rel: &str, url: &str, comment: &str) -> Self {
        self.ops.push(PatchOperation {
            op: Op::Add,
            path: "/relations/-".to_string(),
            value: serde_json::json!({
                "rel": rel,
                "url": url,
                "attributes": { "comment": comment }
            }),
        });
        self
    }

    pub fn ops(&self) -> &[PatchOperation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Azure DevOps REST client authenticated with a personal access token.
pub struct AdoClient {
    base_url: String,
    organization: String,
    auth_header: String,
    client: reqwest::Client,
}

impl AdoClient {
    pub fn new(organization: &str, token: &str) -> Self {
        Self::with_base_url(DEFAULT_HOST, organization, token)
    }

    /// PAT auth is basic auth with an empty user name.
    pub fn with_base_url(base_url: &str, organization: &str, token: &str) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!(":{token}"));
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            organization: organization.to_string(),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }

    fn organization_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(&self.organization)
        )
    }
}

#[derive(Deserialize)]
struct CreatedWorkItem {
    id: Option<i64>,
}

#[async_trait]
impl TrackerClient for AdoClient {
    async fn connect(&self) -> Result<()> {
        let url = format!(
            "{}/_apis/projects?api-version={API_VERSION}&$top=1",
            self.organization_url()
        );

        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Azure DevOps connection request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Azure DevOps rejected the connection: HTTP {status}");
        }
        Ok(())
    }

    async fn create_work_item(
        &self,
        project: &str,
        work_item_type: &str,
        document: &PatchDocument,
    ) -> Result<i64> {
        let url = format!(
            "{}/{}/_apis/wit/workitems/${}?api-version={API_VERSION}",
            self.organization_url(),
            urlencoding::encode(project),
            urlencoding::encode(work_item_type)
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json-patch+json")
            .header("Accept", "application/json")
            .json(document)
            .send()
            .await
            .context("Work item creation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            bail!("Work item creation returned HTTP {status}: {detail}");
        }

        let created: CreatedWorkItem = resp
            .json()
            .await
            .context("Failed to parse the work item creation response")?;

        created
            .id
            .context("The work item creation response did not contain an id")
    }
}
