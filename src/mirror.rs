//! The mirror pipeline: gate on the configured label, scan for an existing
//! back-reference, create the work item, write the marker back.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::config::ActionConfig;
use crate::error::MirrorError;
use crate::event::{Item, ItemKind, Repository};
use crate::marker;
use crate::providers::ado::{self, PatchDocument};
use crate::providers::{SourceClient, TrackerClient};

/// How a run ended. Only `Created` produces the `id` output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The gate label was configured but absent from the item.
    Skipped,
    /// The body already carried a marker; nothing was created.
    AlreadyMirrored(String),
    /// A work item was created and the marker written back.
    Created { id: i64 },
}

pub async fn run<S: SourceClient, T: TrackerClient>(
    config: &ActionConfig,
    kind: ItemKind,
    item: &Item,
    repo: &Repository,
    source: &S,
    tracker: &T,
) -> Result<Outcome, MirrorError> {
    if let Some(required) = &config.label {
        if !item.labels.iter().any(|label| label.name == *required) {
            info!(
                "Configured to only run when the {kind} has the label '{required}', \
                 but it was not found; skipping"
            );
            return Ok(Outcome::Skipped);
        }
    }

    let body = item.body.as_deref().unwrap_or("");

    if !config.dont_check_if_exist {
        info!("Checking if a work item already exists for {kind} #{}", item.number);
        if let Some(id) = marker::find(body) {
            info!("Found existing work item {id}; no need to create a new one");
            return Ok(Outcome::AlreadyMirrored(id));
        }
        info!("Could not find an existing work item, creating one now");
    }

    tracker
        .connect()
        .await
        .map_err(|err| MirrorError::AuthenticationFailed {
            organization: config.organization.clone(),
            detail: MirrorError::detail(&err),
        })?;

    info!(
        "Creating a {} work item for {kind} #{}",
        config.work_item_type, item.number
    );

    let rendered = source
        .render_markdown(&sanitize_body(body), &repo.full_name)
        .await
        .map_err(|err| MirrorError::RemoteCreationFailed {
            detail: MirrorError::detail(&err),
        })?;
    let description = format_description(kind, item.number, &item.html_url, &rendered);

    let document = build_patch_document(config, kind, item, repo, &description);
    let id = tracker
        .create_work_item(&config.project, &config.work_item_type, &document)
        .await
        .map_err(|err| MirrorError::RemoteCreationFailed {
            detail: MirrorError::detail(&err),
        })?;

    // The work item exists from here on; a write-back failure leaves it
    // stranded without a marker and is surfaced as such.
    let new_body = marker::append(body, id);
    source
        .update_body(repo, kind, item.number, &new_body)
        .await
        .map_err(|err| MirrorError::BackReferenceWriteFailed {
            id,
            kind,
            detail: MirrorError::detail(&err),
        })?;

    Ok(Outcome::Created { id })
}

// Signed-URL credentials (`?jwt=...` up to the closing quote) must not end
// up in the permanent work-item description.
static SIGNED_URL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\?jwt=[^"]*"#).unwrap());

pub fn sanitize_body(body: &str) -> String {
    SIGNED_URL_TOKEN.replace_all(body, "").into_owned()
}

pub fn format_title(kind: ItemKind, number: u64, title: &str) -> String {
    format!("[GitHub {kind} #{number}] {title}")
}

/// Configured tags plus the short repository name, semicolon-joined.
pub fn build_tags(configured: Option<&str>, repo_name: &str) -> String {
    match configured {
        Some(tags) if !tags.is_empty() => format!("{tags};{repo_name}"),
        _ => repo_name.to_string(),
    }
}

pub fn format_description(kind: ItemKind, number: u64, html_url: &str, rendered: &str) -> String {
    format!(
        "<hr>\n<em>This work item is a mirror of the GitHub \
         <a href=\"{html_url}\" target=\"_new\">{kind} #{number}</a>. \
         It will not auto-update when the GitHub {kind} changes, \
         please check the original {kind} on GitHub for updates.</em>\n\
         <hr>\n<br>\n{rendered}"
    )
}

fn build_patch_document(
    config: &ActionConfig,
    kind: ItemKind,
    item: &Item,
    repo: &Repository,
    description: &str,
) -> PatchDocument {
    let mut document = PatchDocument::new()
        .field(
            "/fields/System.Title",
            format_title(kind, item.number, &item.title),
        )
        .field("/fields/System.Description", description)
        // Bug forms display repro steps instead of the description, so the
        // mirror text goes into both fields.
        .field("/fields/Microsoft.VSTS.TCM.ReproSteps", description)
        .field(
            "/fields/System.Tags",
            build_tags(config.tags.as_deref(), &repo.name),
        )
        .relation("Hyperlink", &item.html_url);

    if let Some(parent) = &config.parent_work_item {
        document = document.relation_with_comment(
            "System.LinkTypes.Hierarchy-Reverse",
            &ado::work_item_edit_url(&config.organization, parent),
            "",
        );
    }

    document = document.field("/fields/System.AreaPath", config.area_path.as_str());

    if let Some(product) = &config.product {
        document = document.field("/fields/OSG.Product", product.as_str());
    }

    document
}
