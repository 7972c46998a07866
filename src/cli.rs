//! Command-line configuration and the top-level gate pipeline.
//!
//! Every option can also come from the environment so the binary drops
//! straight into a CI step.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;

use crate::comment::{self, CommentApi};
use crate::error::GateError;
use crate::exclude::ExclusionRuleSet;
use crate::gate::{self, Threshold};
use crate::github::{self, GitHubClient};
use crate::ingest;
use crate::model::CoverageVerdict;

/// lcov-gate: fail the build when LCOV line coverage is below a threshold.
#[derive(Parser, Debug)]
#[command(name = "lcov-gate", version, about)]
pub struct Args {
    /// Path to the LCOV tracefile.
    #[arg(long, env = "LCOV_PATH", default_value = "./coverage/lcov.info")]
    pub path: PathBuf,

    /// Minimum line coverage in percent, e.g. 80 or 92.5.
    #[arg(long, env = "MIN_COVERAGE", default_value = "100")]
    pub min_coverage: String,

    /// Space-separated glob patterns of files to leave out of the totals.
    #[arg(long, env = "EXCLUDE", default_value = "")]
    pub exclude: String,

    /// Post (or update) a summary comment on the pull request.
    #[arg(long, env = "REPORT_COMMENT")]
    pub report_comment: bool,

    /// Token for the GitHub API. Without it no comment is posted.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

/// Validated configuration. Building it is where malformed input is
/// rejected, before any report is read.
#[derive(Debug, Clone)]
pub struct Config {
    pub report_path: PathBuf,
    pub min_coverage: Threshold,
    pub exclusions: ExclusionRuleSet,
    pub report_comment: bool,
    pub github_token: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> crate::error::Result<Self> {
        let min_coverage = args.min_coverage.parse::<Threshold>()?;
        let exclusions = ExclusionRuleSet::parse(&args.exclude)?;
        let github_token = args.github_token.filter(|t| !t.trim().is_empty());
        Ok(Self {
            report_path: args.path,
            min_coverage,
            exclusions,
            report_comment: args.report_comment,
            github_token,
        })
    }
}

/// Build the comment client when reporting is enabled and a token is set.
///
/// A missing pull request context is only a warning: the gate still runs.
pub fn comment_client(config: &Config) -> Option<GitHubClient> {
    if !config.report_comment {
        return None;
    }
    let token = config.github_token.as_deref()?;
    match github::Context::from_env() {
        Ok(ctx) => Some(GitHubClient::new(token, ctx)),
        Err(e) => {
            log::warn!("Not posting coverage comment: {e}");
            None
        }
    }
}

/// Load the report, evaluate it and, if enabled, sync the PR comment.
///
/// Comment failures never surface here; only configuration and report
/// errors do.
pub fn check(config: &Config, api: Option<&dyn CommentApi>) -> Result<CoverageVerdict> {
    let records = ingest::load_report(&config.report_path)
        .with_context(|| format!("Failed to load report {}", config.report_path.display()))?;

    let verdict = gate::evaluate(&records, &config.exclusions, config.min_coverage);
    log::info!(
        "Coverage {:.2}% ({}/{} lines), minimum {}%",
        verdict.coverage_percent,
        verdict.total_lines_hit,
        verdict.total_lines_found,
        config.min_coverage
    );

    if config.report_comment {
        comment::sync_best_effort(api, &verdict, config.min_coverage);
    }

    Ok(verdict)
}

/// Turn a failing verdict into an error carrying the missing-line breakdown.
pub fn enforce(verdict: &CoverageVerdict, min_coverage: Threshold) -> crate::error::Result<()> {
    if verdict.passed {
        Ok(())
    } else {
        Err(GateError::CoverageFailure(gate::failure_message(
            verdict,
            min_coverage,
        )))
    }
}
