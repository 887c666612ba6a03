//! News core: pure issue parsing, content hashing and the news record.
mod hash;
mod issue;
mod record;

pub use hash::{content_hash, CONTENT_HASH_LEN};
pub use issue::{
    parse_issue, HeadingLookup, IssueHeading, IssueLines, IssueParser, MissingHeadingPolicy,
    ParseReport,
};
pub use record::ParsedIssue;
