pub mod ado;
pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::event::{ItemKind, Repository};
use self::ado::PatchDocument;

/// The platform the mirrored item lives on. Covers the two calls the
/// pipeline makes against GitHub: rendering a body for the work-item
/// description and pushing the back-reference marker.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Render `text` as GitHub-flavored Markdown HTML, scoped to
    /// `context_repo` (`owner/name`) so relative links and mentions resolve.
    async fn render_markdown(&self, text: &str, context_repo: &str) -> Result<String>;

    /// Replace the body of issue or PR `number` in `repo`.
    async fn update_body(
        &self,
        repo: &Repository,
        kind: ItemKind,
        number: u64,
        body: &str,
    ) -> Result<()>;
}

/// The work-item tracking system the mirror is created in.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Validate that the organization endpoint accepts the credentials.
    async fn connect(&self) -> Result<()>;

    /// Create a work item from a patch document and return its assigned id.
    async fn create_work_item(
        &self,
        project: &str,
        work_item_type: &str,
        document: &PatchDocument,
    ) -> Result<i64>;
}
