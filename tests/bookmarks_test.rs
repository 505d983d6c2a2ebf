use anyhow::Result;
use contrib_kit::core::bookmarks::{BookmarkExporter, HttpTitleFetcher, FOOTER, HEADER};
use contrib_kit::core::TitleFetcher;
use httpmock::prelude::*;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

fn fetcher() -> HttpTitleFetcher {
    HttpTitleFetcher::new(Duration::from_secs(5), "contrib-kit-tests").unwrap()
}

#[tokio::test]
async fn test_fetch_title_from_page() -> Result<()> {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/article");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body("<html><head><title>\n  Fearless Concurrency\n</title></head><body></body></html>");
    });

    let title = fetcher().fetch_title(&server.url("/article")).await?;
    page.assert();
    assert_eq!(title.as_deref(), Some("Fearless Concurrency"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_title_follows_redirects() -> Result<()> {
    let server = MockServer::start();
    let moved = server.mock(|when, then| {
        when.method(GET).path("/old");
        then.status(301).header("Location", server.url("/new"));
    });
    let target = server.mock(|when, then| {
        when.method(GET).path("/new");
        then.status(200).body("<title>New Home</title>");
    });

    let title = fetcher().fetch_title(&server.url("/old")).await?;
    moved.assert();
    target.assert();
    assert_eq!(title.as_deref(), Some("New Home"));
    Ok(())
}

#[tokio::test]
async fn test_http_errors_fall_back_to_url() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404).body("<title>Not Found</title>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/ok");
        then.status(200).body("<title>Fine</title>");
    });

    let urls = vec![server.url("/gone"), server.url("/ok")];
    let exporter = BookmarkExporter::new(fetcher(), Duration::ZERO);
    let mut out = Vec::new();
    let bookmarks = exporter.export(&urls, &mut out).await?;

    assert_eq!(bookmarks[0].title, urls[0]);
    assert_eq!(bookmarks[1].title, "Fine");

    let html = String::from_utf8(out)?;
    assert!(html.starts_with(HEADER));
    assert!(html.trim_end().ends_with(FOOTER));
    assert!(html.contains(&format!("<DT><A HREF=\"{}\">Fine</A>", urls[1])));
    Ok(())
}

#[tokio::test]
async fn test_requests_are_throttled() -> Result<()> {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/page");
        then.status(200).body("<title>Page</title>");
    });

    let urls = vec![server.url("/page"); 3];
    let exporter = BookmarkExporter::new(fetcher(), Duration::from_millis(100));
    let started = std::time::Instant::now();
    exporter.export(&urls, &mut Vec::new()).await?;

    page.assert_hits(3);
    assert!(started.elapsed() >= Duration::from_millis(200));
    Ok(())
}

#[test]
fn test_cli_writes_bookmarks_file() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/one");
        then.status(200).body("<title>One &amp; Only</title>");
    });

    let temp_dir = TempDir::new()?;
    let urls_file = temp_dir.path().join("urls.txt");
    let output_file = temp_dir.path().join("bookmarks.html");
    std::fs::write(&urls_file, format!("{}\r\n\r\n", server.url("/one")))?;

    let status = Command::new(env!("CARGO_BIN_EXE_urls-to-bookmarks"))
        .env_remove("CONTRIB_KIT_CONFIG")
        .arg("--delay-ms")
        .arg("0")
        .arg("--output")
        .arg(&output_file)
        .arg(&urls_file)
        .status()?;
    assert!(status.success());

    let html = std::fs::read_to_string(&output_file)?;
    assert!(html.contains("One &amp; Only</A>"));
    assert_eq!(html.matches("<DT>").count(), 1);
    Ok(())
}

#[test]
fn test_cli_missing_input_exits_1() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = Command::new(env!("CARGO_BIN_EXE_urls-to-bookmarks"))
        .env_remove("CONTRIB_KIT_CONFIG")
        .arg(temp_dir.path().join("missing.txt"))
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    Ok(())
}
