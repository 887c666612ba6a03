use std::path::{Path, PathBuf};

use news_core::ParsedIssue;
use serde::Serialize;

use crate::{AtomicFileWriter, PersistError};

const DELIMITER: &str = "---";

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("serializing front matter failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Field order here is the order in the emitted document.
#[derive(Serialize)]
struct NewsFrontMatter<'a> {
    edition: &'a str,
    title: &'a str,
    image: Option<&'a str>,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    link: &'a str,
}

impl<'a> From<&'a ParsedIssue> for NewsFrontMatter<'a> {
    fn from(issue: &'a ParsedIssue) -> Self {
        Self {
            edition: &issue.edition,
            title: &issue.title,
            image: issue.image.as_deref(),
            description: &issue.description,
            icon: issue.icon.as_deref(),
            link: &issue.link,
        }
    }
}

/// `---\n{yaml}---`: the record as YAML between delimiter lines. Long values
/// are never folded across lines.
pub fn build_front_matter(issue: &ParsedIssue) -> Result<String, EmitError> {
    let yaml = serde_yaml::to_string(&NewsFrontMatter::from(issue))?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}"))
}

/// `{date}-{hash}.md`
pub fn document_filename(issue: &ParsedIssue) -> String {
    format!("{}-{}.md", issue.date, issue.content_hash())
}

/// Writes the document into `output_dir`, replacing an earlier run's file for
/// the same link and date.
pub fn write_news_document(output_dir: &Path, issue: &ParsedIssue) -> Result<PathBuf, EmitError> {
    let document = build_front_matter(issue)?;
    let path = AtomicFileWriter::new(output_dir).write(&document_filename(issue), &document)?;
    Ok(path)
}
