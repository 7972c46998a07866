//! Keeping a single status comment on the pull request in sync with the
//! latest verdict.
//!
//! The comment we own is recognised by [`SIGNATURE`], a hidden HTML marker
//! embedded in every body we write. Each run either updates that comment in
//! place or creates it, so repeated runs never pile up duplicates.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gate::{join_lines, Threshold};
use crate::model::CoverageVerdict;

/// Marker embedded in every comment body this tool writes.
pub const SIGNATURE: &str = "<!-- lcov-gate-comment -->";

/// Opaque identifier of a comment on the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment already present on the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotComment {
    pub id: CommentId,
    pub author_is_bot: bool,
    pub body: String,
}

/// The three hosting-platform calls the synchronizer needs.
pub trait CommentApi {
    /// All comments on the pull request, in the order the platform returns them.
    fn list_comments(&self) -> Result<Vec<BotComment>>;

    fn create_comment(&self, body: &str) -> Result<CommentId>;

    /// Replace the body of an existing comment.
    fn update_comment(&self, id: CommentId, body: &str) -> Result<()>;
}

/// The single mutation a sync run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEffect {
    Create { body: String },
    Update { id: CommentId, body: String },
}

/// What a sync run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created(CommentId),
    Updated(CommentId),
    /// No credential, nothing was sent.
    Skipped,
}

/// Return the id of the first bot-authored comment whose body contains
/// `signature`, scanning in the given order.
///
/// The input order is significant: if the platform lists newest first, the
/// newest matching comment wins.
#[must_use]
pub fn find_signed_comment(comments: &[BotComment], signature: &str) -> Option<CommentId> {
    for c in comments {
        if c.author_is_bot && c.body.contains(signature) {
            return Some(c.id);
        }
    }
    None
}

/// Render the markdown body for the status comment.
#[must_use]
pub fn format_message(verdict: &CoverageVerdict, min_coverage: Threshold) -> String {
    let mut md = String::new();

    let glyph = if verdict.passed { "✅" } else { "❌" };
    let pct = verdict.coverage_percent;
    let min = min_coverage.value();

    writeln!(md, "{SIGNATURE}").unwrap();
    writeln!(md, "### {glyph} Code coverage: {pct:.2}%\n").unwrap();
    writeln!(
        md,
        "**{}** of **{}** lines covered (minimum: {min}%, gap: {:.2}%)",
        verdict.total_lines_hit,
        verdict.total_lines_found,
        verdict.gap_to(min)
    )
    .unwrap();

    if !verdict.missing_by_file.is_empty() {
        md.push_str("\n<details>\n<summary>Uncovered lines</summary>\n\n");
        for (path, lines) in verdict.missing_by_file.iter() {
            writeln!(md, "- `{path}`: {}", join_lines(lines)).unwrap();
        }
        md.push_str("\n</details>\n");
    }

    md
}

/// Decide the mutation for `message` given the id of our existing comment.
#[must_use]
pub fn plan(existing: Option<CommentId>, message: &str) -> CommentEffect {
    match existing {
        Some(id) => CommentEffect::Update {
            id,
            body: message.to_string(),
        },
        None => CommentEffect::Create {
            body: message.to_string(),
        },
    }
}

/// Update our existing comment or create a new one.
///
/// `api` is `None` when no credential was supplied; that is not an error,
/// the call simply does nothing.
pub fn upsert(
    api: Option<&dyn CommentApi>,
    existing: Option<CommentId>,
    message: &str,
) -> Result<SyncOutcome> {
    let Some(api) = api else {
        log::debug!("No GitHub token, skipping comment");
        return Ok(SyncOutcome::Skipped);
    };

    match plan(existing, message) {
        CommentEffect::Update { id, body } => {
            api.update_comment(id, &body)?;
            log::info!("Updated coverage comment {id}");
            Ok(SyncOutcome::Updated(id))
        }
        CommentEffect::Create { body } => {
            let id = api.create_comment(&body)?;
            log::info!("Created coverage comment {id}");
            Ok(SyncOutcome::Created(id))
        }
    }
}

/// List comments, find ours and upsert the rendered verdict.
pub fn sync(
    api: Option<&dyn CommentApi>,
    verdict: &CoverageVerdict,
    min_coverage: Threshold,
) -> Result<SyncOutcome> {
    let Some(client) = api else {
        log::debug!("No GitHub token, skipping comment");
        return Ok(SyncOutcome::Skipped);
    };

    let comments = client.list_comments()?;
    let existing = find_signed_comment(&comments, SIGNATURE);
    upsert(api, existing, &format_message(verdict, min_coverage))
}

/// Like [`sync`], but failures are logged and swallowed so that reporting
/// can never change the outcome of the gate.
pub fn sync_best_effort(
    api: Option<&dyn CommentApi>,
    verdict: &CoverageVerdict,
    min_coverage: Threshold,
) -> Option<SyncOutcome> {
    match sync(api, verdict, min_coverage) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            log::warn!("Could not post coverage comment: {e}");
            None
        }
    }
}
