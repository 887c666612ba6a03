use std::path::PathBuf;

use news_core::{IssueParser, MissingHeadingPolicy};
use news_logging::{news_info, news_warn};

use crate::{write_news_document, AssetLayout, EmitError, Enricher, FetchSettings, Fetcher};

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory the news document is written to.
    pub output_dir: PathBuf,
    /// Root of the image tree; assets go under `news/covers` and `news/icons`.
    pub images_dir: PathBuf,
    pub missing_heading_policy: MissingHeadingPolicy,
    pub fetch: FetchSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("_news"),
            images_dir: PathBuf::from("images"),
            missing_heading_policy: MissingHeadingPolicy::default(),
            fetch: FetchSettings::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn asset_layout(&self) -> AssetLayout {
        AssetLayout::under_images_dir(&self.images_dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("writing the news document failed: {0}")]
    Emit(#[from] EmitError),
}

/// Parses `issue_body`, enriches it over the network and writes the news
/// document. Only the final write can fail; enrichment problems are logged
/// and leave their fields empty.
pub async fn run(
    issue_body: &str,
    config: &GeneratorConfig,
    fetcher: &dyn Fetcher,
) -> Result<PathBuf, PipelineError> {
    let report = IssueParser::new(config.missing_heading_policy).parse_with_report(issue_body);
    for heading in &report.missing {
        news_warn!(
            "Issue body has no {:?} heading; using {:?} policy",
            heading.as_line(),
            config.missing_heading_policy
        );
    }
    let issue = report.issue;
    news_info!(
        "Parsed issue link={} edition={:?} date={:?}",
        issue.link,
        issue.edition,
        issue.date
    );

    let issue = Enricher::new(fetcher, config.asset_layout())
        .enrich(issue)
        .await;

    let path = write_news_document(&config.output_dir, &issue)?;
    news_info!("News document written to {}", path.display());
    Ok(path)
}
