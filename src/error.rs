use thiserror::Error;

use crate::event::ItemKind;

/// Terminal failures of a mirror run. Every variant carries the underlying
/// failure detail so the message surfaced to the workflow log names the
/// actual cause, and none of them is retried.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The tracking-system connection could not be established. Nothing was
    /// created and nothing was written back.
    #[error("Could not connect to Azure DevOps organization '{organization}': {detail}")]
    AuthenticationFailed {
        organization: String,
        detail: String,
    },

    /// The work-item creation call failed or returned no identifier. No
    /// back-reference write was attempted.
    #[error("Failed to create the work item: {detail}")]
    RemoteCreationFailed { detail: String },

    /// The work item exists but the marker could not be written back, so a
    /// later run will not find it and may create a duplicate. Not rolled
    /// back.
    #[error(
        "Work item {id} was created, but appending AB#{id} to the {kind} body failed: {detail}"
    )]
    BackReferenceWriteFailed {
        id: i64,
        kind: ItemKind,
        detail: String,
    },
}

impl MirrorError {
    /// Captures an error chain as the visible failure detail.
    pub(crate) fn detail(err: &anyhow::Error) -> String {
        format!("{err:#}")
    }
}
