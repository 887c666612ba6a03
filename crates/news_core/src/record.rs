/// A news appearance as it moves through the pipeline.
///
/// The parser fills `link`, `edition` and `date`; enrichment fills the rest.
/// `image` is `None` when no cover could be stored and is still emitted (as
/// `null`), whereas `icon` is only ever set on success and is omitted otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIssue {
    pub link: String,
    pub edition: String,
    pub date: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub icon: Option<String>,
}

impl ParsedIssue {
    /// Content hash of the link, shared by the cover image and document names.
    pub fn content_hash(&self) -> String {
        crate::content_hash(&self.link)
    }
}
