//! News engine: fetching, metadata harvesting, asset download and document output.
mod decode;
mod download;
mod enrich;
mod fetch;
mod frontmatter;
mod metadata;
mod persist;
mod pipeline;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use download::{
    extension_for_content_type, favicon_extension, AssetDownloader, DownloadError,
};
pub use enrich::{AssetLayout, Enricher};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use frontmatter::{build_front_matter, document_filename, write_news_document, EmitError};
pub use metadata::{
    cover_image_from_html, favicon_from_html, title_and_description_from_html, MetadataError,
    MetadataExtractor, TitleAndDescription,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{run, GeneratorConfig, PipelineError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
