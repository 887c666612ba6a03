use std::path::{Path, PathBuf};

use news_logging::{news_info, news_warn};
use url::Url;

use crate::{AtomicFileWriter, FetchError, Fetcher, PersistError};

const DEFAULT_FAVICON_EXTENSION: &str = "ico";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("downloading {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("saving {url} failed: {source}")]
    Persist {
        url: String,
        #[source]
        source: PersistError,
    },
    #[error("{url} has no host to name the icon after")]
    MissingHost { url: String },
    #[error("destination {0} has no file name")]
    InvalidDestination(PathBuf),
}

/// Maps a response media type to the extension cover images are saved with.
/// Parameters such as `; charset=` are ignored; unknown types yield `None`.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or(content_type).trim();
    let ext = match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/tiff" => "tiff",
        _ => return None,
    };
    Some(ext)
}

/// Extension of the last path segment of `url` (without the dot), or `ico`.
pub fn favicon_extension(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    match segment.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < segment.len() => segment[idx + 1..].to_string(),
        _ => DEFAULT_FAVICON_EXTENSION.to_string(),
    }
}

/// Fetches images and icons and stores them on disk.
pub struct AssetDownloader<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> AssetDownloader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Saves `source` as `{destination}.{ext}` with `ext` taken from the
    /// response content type.
    ///
    /// Returns `Ok(None)` without touching the disk when the content type is
    /// missing or not a known image type.
    pub async fn download(
        &self,
        source: &Url,
        destination: &Path,
    ) -> Result<Option<&'static str>, DownloadError> {
        let (dir, stem) = split_destination(destination)?;
        let output = self.fetch(source).await?;

        let content_type = output.metadata.content_type.as_deref().unwrap_or_default();
        let Some(ext) = extension_for_content_type(content_type) else {
            news_warn!(
                "Unable to determine the file extension for {} (content type {:?})",
                source,
                content_type
            );
            return Ok(None);
        };

        let filename = format!("{stem}.{ext}");
        let path = AtomicFileWriter::new(dir)
            .write_bytes(&filename, &output.bytes)
            .map_err(|source_err| DownloadError::Persist {
                url: source.to_string(),
                source: source_err,
            })?;
        news_info!("Image saved to {}", path.display());
        Ok(Some(ext))
    }

    /// Saves a favicon as `{icons_dir}/{hostname}.{ext}` where `ext` comes from
    /// the URL path, whatever the server reports as content type. Returns the
    /// file name.
    pub async fn download_favicon(
        &self,
        source: &Url,
        icons_dir: &Path,
    ) -> Result<String, DownloadError> {
        let host = source.host_str().ok_or_else(|| DownloadError::MissingHost {
            url: source.to_string(),
        })?;
        let filename = format!("{host}.{}", favicon_extension(source));
        let output = self.fetch(source).await?;

        let path = AtomicFileWriter::new(icons_dir)
            .write_bytes(&filename, &output.bytes)
            .map_err(|source_err| DownloadError::Persist {
                url: source.to_string(),
                source: source_err,
            })?;
        news_info!("Favicon saved to {}", path.display());
        Ok(filename)
    }

    async fn fetch(&self, source: &Url) -> Result<crate::FetchOutput, DownloadError> {
        self.fetcher
            .fetch(source.as_str())
            .await
            .map_err(|err| DownloadError::Fetch {
                url: source.to_string(),
                source: err,
            })
    }
}

fn split_destination(destination: &Path) -> Result<(PathBuf, String), DownloadError> {
    let stem = destination
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DownloadError::InvalidDestination(destination.to_path_buf()))?;
    let dir = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, stem.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{extension_for_content_type, favicon_extension, split_destination};
    use std::path::{Path, PathBuf};
    use url::Url;

    fn ext(url: &str) -> String {
        favicon_extension(&Url::parse(url).unwrap())
    }

    #[test]
    fn content_type_table() {
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_content_type("image/svg+xml"), Some("svg"));
        assert_eq!(extension_for_content_type("image/tiff"), Some("tiff"));
        assert_eq!(extension_for_content_type("IMAGE/PNG; charset=binary"), Some("png"));
        assert_eq!(extension_for_content_type("text/html"), None);
        assert_eq!(extension_for_content_type("image/x-icon"), None);
        assert_eq!(extension_for_content_type(""), None);
    }

    #[test]
    fn favicon_extension_comes_from_path() {
        assert_eq!(ext("https://example.com/static/icon.png"), "png");
        assert_eq!(ext("https://example.com/favicon.ico?v=3"), "ico");
        assert_eq!(ext("https://example.com/a.b/icon"), "ico");
        assert_eq!(ext("https://example.com/"), "ico");
        assert_eq!(ext("https://example.com/.hidden"), "ico");
        assert_eq!(ext("https://example.com/icon."), "ico");
        assert_eq!(ext("https://example.com/icon.min.svg"), "svg");
    }

    #[test]
    fn destination_is_split_into_dir_and_stem() {
        let (dir, stem) = split_destination(Path::new("images/news/covers/abc")).unwrap();
        assert_eq!(dir, PathBuf::from("images/news/covers"));
        assert_eq!(stem, "abc");
        assert!(split_destination(Path::new("/")).is_err());
    }
}
