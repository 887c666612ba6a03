use news_logging::{news_debug, news_error};
use scraper::{Html, Selector};
use url::Url;

use crate::{decode_html, FetchError, Fetcher};

const FALLBACK_FAVICON: &str = "/favicon.ico";

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("page url {url} is not absolute: {source}")]
    PageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleAndDescription {
    pub title: String,
    pub description: String,
}

/// Harvests page metadata through a [`Fetcher`].
///
/// Every method fetches the page again and turns any failure into `None`
/// after logging it; callers never see fetch errors.
pub struct MetadataExtractor<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    pub async fn title_and_description(&self, page_url: &str) -> Option<TitleAndDescription> {
        match self.fetch_page(page_url).await {
            Ok((html, _)) => Some(title_and_description_from_html(&html)),
            Err(err) => {
                news_error!("Error fetching title and description: {}", err);
                None
            }
        }
    }

    pub async fn cover_image_url(&self, page_url: &str) -> Option<Url> {
        match self.fetch_page(page_url).await {
            Ok((html, base)) => cover_image_from_html(&html, &base),
            Err(err) => {
                news_error!("Error fetching the og:image: {}", err);
                None
            }
        }
    }

    pub async fn favicon_url(&self, page_url: &str) -> Option<Url> {
        match self.fetch_page(page_url).await {
            Ok((html, base)) => favicon_from_html(&html, &base),
            Err(err) => {
                news_error!("Error fetching the favicon: {}", err);
                None
            }
        }
    }

    /// Decoded page text plus the URL relative references resolve against.
    async fn fetch_page(&self, page_url: &str) -> Result<(String, Url), MetadataError> {
        let output = self
            .fetcher
            .fetch(page_url)
            .await
            .map_err(|source| MetadataError::Fetch {
                url: page_url.to_string(),
                source,
            })?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let base = Url::parse(&output.metadata.final_url).map_err(|source| {
            MetadataError::PageUrl {
                url: output.metadata.final_url.clone(),
                source,
            }
        })?;
        news_debug!(
            "decoded {} as {} ({} chars)",
            base,
            decoded.encoding_label,
            decoded.html.len()
        );
        if decoded.had_errors {
            news_debug!("{} had malformed {} sequences; replaced", base, decoded.encoding_label);
        }
        Ok((decoded.html, base))
    }
}

/// Title from the first `<title>`; description from `og:description`, then
/// `meta[name=description]`, then empty.
pub fn title_and_description_from_html(html: &str) -> TitleAndDescription {
    let doc = Html::parse_document(html);
    let title = select_first(&doc, "title")
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let description = meta_content(&doc, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(&doc, r#"meta[name="description"]"#))
        .unwrap_or_default();
    TitleAndDescription { title, description }
}

/// The `og:image` value resolved against `base`, if present and non-empty.
pub fn cover_image_from_html(html: &str, base: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);
    let raw = meta_content(&doc, r#"meta[property="og:image"]"#)?;
    match base.join(&raw) {
        Ok(url) => Some(url),
        Err(err) => {
            news_error!("Ignoring og:image {:?}: {}", raw, err);
            None
        }
    }
}

/// `link[rel=icon]`, then `link[rel="shortcut icon"]`, then `/favicon.ico`,
/// resolved against `base`.
pub fn favicon_from_html(html: &str, base: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);
    let href = [r#"link[rel="icon"]"#, r#"link[rel="shortcut icon"]"#]
        .into_iter()
        .find_map(|selector| attr_value(&doc, selector, "href"))
        .unwrap_or_else(|| FALLBACK_FAVICON.to_string());
    match base.join(&href) {
        Ok(url) => Some(url),
        Err(err) => {
            news_error!("Ignoring favicon href {:?}: {}", href, err);
            None
        }
    }
}

fn select_first<'a>(doc: &'a Html, selector: &str) -> Option<scraper::ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next()
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    attr_value(doc, selector, "content")
}

/// Attribute of the first element matching `selector`; empty values count as absent.
fn attr_value(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    select_first(doc, selector)
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
