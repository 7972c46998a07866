//! GitHub REST client for the coverage status comment.

use serde::Deserialize;

use crate::comment::{BotComment, CommentApi, CommentId};
use crate::error::{GateError, Result};

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Pull request being reported on, resolved from GitHub Actions variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub api_url: String,
    pub repo: String,
    pub pr_number: u64,
}

impl Context {
    /// Read `GITHUB_REPOSITORY`, `GITHUB_REF` and (optionally)
    /// `GITHUB_API_URL` from the environment.
    pub fn from_env() -> Result<Self> {
        let repo = std::env::var("GITHUB_REPOSITORY").map_err(|_| {
            GateError::Api("GITHUB_REPOSITORY environment variable is required".to_string())
        })?;
        let github_ref = std::env::var("GITHUB_REF").unwrap_or_default();
        let pr_number = pr_number_from_ref(&github_ref).ok_or_else(|| {
            GateError::Api(format!(
                "could not determine PR number from GITHUB_REF '{github_ref}'"
            ))
        })?;
        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self {
            api_url,
            repo,
            pr_number,
        })
    }
}

/// Extract the PR number from a ref like `refs/pull/42/merge`.
#[must_use]
pub fn pr_number_from_ref(github_ref: &str) -> Option<u64> {
    let parts: Vec<&str> = github_ref.split('/').collect();
    if parts.len() >= 3 && parts[0] == "refs" && parts[1] == "pull" {
        parts[2].parse().ok()
    } else {
        None
    }
}

/// `CommentApi` backed by the GitHub issues-comments endpoints.
pub struct GitHubClient {
    token: String,
    context: Context,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, context: Context) -> Self {
        Self {
            token: token.into(),
            context,
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        ureq::request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "lcov-gate")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[derive(Deserialize)]
struct User {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct Comment {
    id: CommentId,
    body: Option<String>,
    user: Option<User>,
}

impl From<Comment> for BotComment {
    fn from(c: Comment) -> Self {
        BotComment {
            id: c.id,
            author_is_bot: c.user.is_some_and(|u| u.kind == "Bot"),
            body: c.body.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct Created {
    id: CommentId,
}

/// Turn a ureq failure into an API error, keeping the response body for
/// status errors.
fn api_error(action: &str, err: ureq::Error) -> GateError {
    match err {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            GateError::Api(format!("{action} failed (HTTP {code}): {body}"))
        }
        other => GateError::Api(format!("{action} failed: {other}")),
    }
}

impl CommentApi for GitHubClient {
    fn list_comments(&self) -> Result<Vec<BotComment>> {
        let Context {
            api_url,
            repo,
            pr_number,
        } = &self.context;
        log::info!("Fetching comments for {repo}/pull/{pr_number} ...");

        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let url = format!(
                "{api_url}/repos/{repo}/issues/{pr_number}/comments?per_page=100&page={page}"
            );
            let resp = self
                .request("GET", &url)
                .call()
                .map_err(|e| api_error("Listing comments", e))?;
            let comments: Vec<Comment> = resp
                .into_json()
                .map_err(|e| GateError::Api(format!("Failed to parse comments JSON: {e}")))?;
            if comments.is_empty() {
                break;
            }
            all.extend(comments.into_iter().map(BotComment::from));
            page += 1;
        }
        log::debug!("Found {} comments", all.len());
        Ok(all)
    }

    fn create_comment(&self, body: &str) -> Result<CommentId> {
        let Context {
            api_url,
            repo,
            pr_number,
        } = &self.context;
        let url = format!("{api_url}/repos/{repo}/issues/{pr_number}/comments");
        let resp = self
            .request("POST", &url)
            .send_json(serde_json::json!({ "body": body }))
            .map_err(|e| api_error("Creating comment", e))?;
        let created: Created = resp
            .into_json()
            .map_err(|e| GateError::Api(format!("Failed to parse created comment: {e}")))?;
        Ok(created.id)
    }

    fn update_comment(&self, id: CommentId, body: &str) -> Result<()> {
        let Context { api_url, repo, .. } = &self.context;
        let url = format!("{api_url}/repos/{repo}/issues/comments/{id}");
        self.request("PATCH", &url)
            .send_json(serde_json::json!({ "body": body }))
            .map_err(|e| api_error("Updating comment", e))?;
        Ok(())
    }
}
