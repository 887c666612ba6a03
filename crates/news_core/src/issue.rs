use crate::ParsedIssue;

/// Headings of the "news appearance" issue template, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueHeading {
    Link,
    Edition,
    PublicationDate,
}

impl IssueHeading {
    pub const ALL: [IssueHeading; 3] = [
        IssueHeading::Link,
        IssueHeading::Edition,
        IssueHeading::PublicationDate,
    ];

    /// The exact line the template renders for this heading.
    pub fn as_line(self) -> &'static str {
        match self {
            IssueHeading::Link => "### News appearance link",
            IssueHeading::Edition => "### From which edition is it from?",
            IssueHeading::PublicationDate => "### Publication date",
        }
    }
}

/// What to substitute when a heading is not present in the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingHeadingPolicy {
    /// Use the first non-empty line of the body. Matches the output of the
    /// generator that produced the existing news files.
    #[default]
    FirstLine,
    /// Use the empty string.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLookup<'a> {
    Found(&'a str),
    /// The heading is the last line, so there is nothing after it.
    NoValue,
    Missing,
}

/// Issue body normalized into dense, trimmed, non-empty lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLines {
    lines: Vec<String>,
}

impl IssueLines {
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { lines }
    }

    pub fn first(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Value on the line right after the first exact match of `heading`.
    pub fn lookup(&self, heading: IssueHeading) -> HeadingLookup<'_> {
        let target = heading.as_line();
        match self.lines.iter().position(|line| line == target) {
            Some(idx) => match self.lines.get(idx + 1) {
                Some(value) => HeadingLookup::Found(value),
                None => HeadingLookup::NoValue,
            },
            None => HeadingLookup::Missing,
        }
    }
}

/// Parse result plus the headings that had to be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub issue: ParsedIssue,
    pub missing: Vec<IssueHeading>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IssueParser {
    policy: MissingHeadingPolicy,
}

impl IssueParser {
    pub fn new(policy: MissingHeadingPolicy) -> Self {
        Self { policy }
    }

    pub fn parse(&self, text: &str) -> ParsedIssue {
        self.parse_with_report(text).issue
    }

    /// Never fails; absent headings resolve according to the policy and are
    /// listed in the report.
    pub fn parse_with_report(&self, text: &str) -> ParseReport {
        let lines = IssueLines::from_text(text);
        let mut missing = Vec::new();
        let mut value_for = |heading: IssueHeading| -> String {
            match lines.lookup(heading) {
                HeadingLookup::Found(value) => value.to_string(),
                HeadingLookup::NoValue => String::new(),
                HeadingLookup::Missing => {
                    missing.push(heading);
                    match self.policy {
                        MissingHeadingPolicy::FirstLine => {
                            lines.first().unwrap_or_default().to_string()
                        }
                        MissingHeadingPolicy::Empty => String::new(),
                    }
                }
            }
        };

        let issue = ParsedIssue {
            link: value_for(IssueHeading::Link),
            edition: value_for(IssueHeading::Edition),
            date: value_for(IssueHeading::PublicationDate),
            ..ParsedIssue::default()
        };

        ParseReport { issue, missing }
    }
}

/// Parse with the default (first-line fallback) policy.
pub fn parse_issue(text: &str) -> ParsedIssue {
    IssueParser::default().parse(text)
}
