use anyhow::Result;
use clap::Parser;

use lcov_gate::cli::{self, Args, Config};
use lcov_gate::comment::CommentApi;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::from_args(args)?;

    let client = cli::comment_client(&config);
    let api = client.as_ref().map(|c| c as &dyn CommentApi);

    let verdict = cli::check(&config, api)?;
    cli::enforce(&verdict, config.min_coverage)?;

    println!(
        "Coverage {:.2}% meets the minimum of {}%",
        verdict.coverage_percent, config.min_coverage
    );
    Ok(())
}
