#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use news_engine::{FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher};

pub fn init_logging() {
    news_logging::initialize_for_tests();
}

/// Serves canned responses by URL and records every request.
#[derive(Default)]
pub struct CannedFetcher {
    responses: HashMap<String, (Option<String>, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            (content_type.map(ToOwned::to_owned), body.into()),
        );
        self
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with(url, Some("text/html; charset=utf-8"), html)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let (content_type, bytes) = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "not found"))?;
        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

/// Fails every request with a network error.
pub struct FailingFetcher;

#[async_trait::async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchOutput, FetchError> {
        Err(FetchError::new(FailureKind::Network, "connection refused"))
    }
}

pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
