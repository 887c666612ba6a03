mod common;

use common::{files_in, init_logging};
use news_core::{content_hash, MissingHeadingPolicy};
use news_engine::{run, FetchSettings, GeneratorConfig, ReqwestFetcher};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn body(link: &str) -> String {
    format!(
        "### News appearance link\n\n{link}\n\n### From which edition is it from?\n\nWinter 2024\n\n### Publication date\n\n2024-01-05\n"
    )
}

fn config(temp: &TempDir) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: temp.path().join("_news"),
        images_dir: temp.path().join("images"),
        ..GeneratorConfig::default()
    }
}

#[tokio::test]
async fn issue_body_becomes_news_document_with_assets() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>Feature</title><meta name="description" content="About us"><meta property="og:image" content="/cover"></head></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cover"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"GIF89a".to_vec(), "image/gif"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ICO".to_vec(), "image/x-icon"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let link = format!("{}/article", server.uri());
    let hash = content_hash(&link);
    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let written = run(&body(&link), &config, &fetcher).await.unwrap();

    assert_eq!(
        written,
        config.output_dir.join(format!("2024-01-05-{hash}.md"))
    );
    let document = std::fs::read_to_string(&written).unwrap();
    assert_eq!(
        document,
        format!(
            "---\nedition: Winter 2024\ntitle: Feature\nimage: {hash}.gif\ndescription: About us\nicon: 127.0.0.1.ico\nlink: {link}\n---"
        )
    );
    let layout = config.asset_layout();
    assert_eq!(files_in(&layout.covers_dir), vec![format!("{hash}.gif")]);
    assert_eq!(files_in(&layout.icons_dir), vec!["127.0.0.1.ico".to_string()]);
}

#[tokio::test]
async fn unreachable_page_still_produces_document() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let link = format!("{}/gone", server.uri());
    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let written = run(&body(&link), &config, &fetcher).await.unwrap();

    let document = std::fs::read_to_string(written).unwrap();
    assert_eq!(
        document,
        format!("---\nedition: Winter 2024\ntitle: ''\nimage: null\ndescription: ''\nlink: {link}\n---")
    );
    assert!(files_in(&config.asset_layout().covers_dir).is_empty());
    assert!(files_in(&config.asset_layout().icons_dir).is_empty());
}

#[tokio::test]
async fn strict_policy_empties_missing_date() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = GeneratorConfig {
        missing_heading_policy: MissingHeadingPolicy::Empty,
        ..config(&temp)
    };
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let issue = "### News appearance link\nnot a url\n### From which edition is it from?\nSpring";

    let written = run(issue, &config, &fetcher).await.unwrap();

    let expected = format!("-{}.md", content_hash("not a url"));
    assert_eq!(written.file_name().unwrap().to_string_lossy(), expected);
}

#[tokio::test]
async fn output_write_failure_is_fatal() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let config = GeneratorConfig {
        output_dir: blocker,
        ..config(&temp)
    };
    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let result = run("### News appearance link\nnot a url", &config, &fetcher).await;

    assert!(result.is_err());
}
