use std::path::{Path, PathBuf};

use news_core::{content_hash, ParsedIssue};
use news_logging::{news_error, news_info, news_warn};
use url::Url;

use crate::{AssetDownloader, Fetcher, MetadataExtractor, TitleAndDescription};

/// Where downloaded covers and icons are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub covers_dir: PathBuf,
    pub icons_dir: PathBuf,
}

impl AssetLayout {
    /// `{images_dir}/news/covers` and `{images_dir}/news/icons`.
    pub fn under_images_dir(images_dir: &Path) -> Self {
        let news = images_dir.join("news");
        Self {
            covers_dir: news.join("covers"),
            icons_dir: news.join("icons"),
        }
    }
}

/// Fills in cover image, favicon, title and description for a parsed issue.
///
/// Steps run one after another: cover, favicon, then title and description.
/// Each step is best-effort; a failure is logged and leaves its fields at
/// their empty value without stopping later steps.
pub struct Enricher<'a> {
    fetcher: &'a dyn Fetcher,
    layout: AssetLayout,
}

impl<'a> Enricher<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, layout: AssetLayout) -> Self {
        Self { fetcher, layout }
    }

    pub async fn enrich(&self, mut issue: ParsedIssue) -> ParsedIssue {
        let hash = content_hash(&issue.link);

        issue.image = self.save_cover(&issue.link, &hash).await;
        if let Some(icon) = self.save_favicon(&issue.link).await {
            issue.icon = Some(icon);
        }
        if let Some(TitleAndDescription { title, description }) = self
            .metadata()
            .title_and_description(&issue.link)
            .await
        {
            issue.title = title;
            issue.description = description;
        }

        issue
    }

    /// `{hash}.{ext}` when a cover was found and stored.
    async fn save_cover(&self, link: &str, hash: &str) -> Option<String> {
        let cover_url = self.metadata().cover_image_url(link).await?;
        let destination = self.layout.covers_dir.join(hash);
        news_info!("Downloading {} to {}", cover_url, destination.display());

        match self.downloader().download(&cover_url, &destination).await {
            Ok(Some(ext)) => Some(format!("{hash}.{ext}")),
            Ok(None) => None,
            Err(err) => {
                news_error!("Error saving the cover image: {}", err);
                None
            }
        }
    }

    async fn save_favicon(&self, link: &str) -> Option<String> {
        let Some(favicon_url) = self.metadata().favicon_url(link).await else {
            news_warn!("Couldn't find a favicon.");
            return None;
        };
        self.store_favicon(&favicon_url).await
    }

    async fn store_favicon(&self, favicon_url: &Url) -> Option<String> {
        match self
            .downloader()
            .download_favicon(favicon_url, &self.layout.icons_dir)
            .await
        {
            Ok(filename) => Some(filename),
            Err(err) => {
                news_error!("Error saving the favicon: {}", err);
                None
            }
        }
    }

    fn metadata(&self) -> MetadataExtractor<'a> {
        MetadataExtractor::new(self.fetcher)
    }

    fn downloader(&self) -> AssetDownloader<'a> {
        AssetDownloader::new(self.fetcher)
    }
}
