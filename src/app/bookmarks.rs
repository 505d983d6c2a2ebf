use crate::config::BookmarksArgs;
use crate::core::bookmarks::{parse_url_list, BookmarkExporter, HttpTitleFetcher};
use crate::utils::cli::report_error;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;

pub async fn run(args: BookmarksArgs) -> i32 {
    let Some(settings) = super::prepare("urls-to-bookmarks", &args.common) else {
        return 1;
    };

    let delay_ms = args.delay_ms.unwrap_or(settings.bookmarks.delay_ms);
    let timeout_seconds = args.timeout_seconds.unwrap_or(settings.bookmarks.timeout_seconds);

    match export(&args, delay_ms, timeout_seconds, &settings.bookmarks.user_agent).await {
        Ok(count) => {
            tracing::info!("Wrote {} bookmarks", count);
            0
        }
        Err(e) => {
            report_error("urls-to-bookmarks", &e);
            1
        }
    }
}

async fn export(args: &BookmarksArgs, delay_ms: u64, timeout_seconds: u64, user_agent: &str) -> Result<usize> {
    validate_range("--delay-ms", delay_ms, 0, 60_000)?;
    validate_range("--timeout-seconds", timeout_seconds, 1, 300)?;

    let content = tokio::fs::read_to_string(&args.urls_file).await?;
    let urls = parse_url_list(&content);
    tracing::info!("Read {} URLs from {}", urls.len(), args.urls_file.display());

    let fetcher = HttpTitleFetcher::new(Duration::from_secs(timeout_seconds), user_agent)?;
    let exporter = BookmarkExporter::new(fetcher, Duration::from_millis(delay_ms));

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let bookmarks = exporter.export(&urls, &mut out).await?;
    Ok(bookmarks.len())
}
