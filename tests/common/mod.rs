#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;

use lcov_gate::cli::Config;
use lcov_gate::comment::{BotComment, CommentApi, CommentId};
use lcov_gate::error::{GateError, Result};
use lcov_gate::exclude::ExclusionRuleSet;
use lcov_gate::model::FileCoverageRecord;
use tempfile::TempDir;

/// Write `content` as an LCOV file in a fresh temp dir. The caller must hold
/// onto `TempDir` to keep the file alive.
pub fn write_report(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lcov.info");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn config(path: PathBuf, min_coverage: &str, exclude: &str) -> Config {
    Config {
        report_path: path,
        min_coverage: min_coverage.parse().unwrap(),
        exclusions: ExclusionRuleSet::parse(exclude).unwrap(),
        report_comment: true,
        github_token: None,
    }
}

pub fn record(path: &str, found: u64, hit: u64, uncovered: &[u32]) -> FileCoverageRecord {
    FileCoverageRecord {
        path: path.to_string(),
        lines_found: found,
        lines_hit: hit,
        uncovered_lines: uncovered.to_vec(),
    }
}

/// In-memory pull request thread.
#[derive(Default)]
pub struct FakeThread {
    pub comments: RefCell<Vec<BotComment>>,
    pub fail: bool,
    pub calls: RefCell<Vec<&'static str>>,
}

impl FakeThread {
    pub fn new(comments: Vec<BotComment>) -> Self {
        Self {
            comments: RefCell::new(comments),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl CommentApi for FakeThread {
    fn list_comments(&self) -> Result<Vec<BotComment>> {
        self.calls.borrow_mut().push("list");
        if self.fail {
            return Err(GateError::Api("Listing comments failed (HTTP 500)".into()));
        }
        Ok(self.comments.borrow().clone())
    }

    fn create_comment(&self, body: &str) -> Result<CommentId> {
        self.calls.borrow_mut().push("create");
        let mut comments = self.comments.borrow_mut();
        let id = CommentId(1000 + comments.len() as u64);
        comments.push(BotComment {
            id,
            author_is_bot: true,
            body: body.to_string(),
        });
        Ok(id)
    }

    fn update_comment(&self, id: CommentId, body: &str) -> Result<()> {
        self.calls.borrow_mut().push("update");
        let mut comments = self.comments.borrow_mut();
        match comments.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.body = body.to_string();
                Ok(())
            }
            None => Err(GateError::Api(format!("comment {id} not found"))),
        }
    }
}
