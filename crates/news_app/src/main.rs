mod config;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use news_engine::ReqwestFetcher;
use news_logging::news_error;

use crate::config::AppConfig;

fn main() -> ExitCode {
    match run_app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            news_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("reading configuration from the environment")?;
    logging::initialize(&config.logging);

    let runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
    let fetcher = ReqwestFetcher::new(config.generator.fetch.clone());
    runtime
        .block_on(news_engine::run(
            &config.issue_body,
            &config.generator,
            &fetcher,
        ))
        .context("generating the news file")?;
    Ok(())
}
