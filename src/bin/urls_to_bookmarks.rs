use contrib_kit::app;
use contrib_kit::config::BookmarksArgs;
use contrib_kit::utils::cli::parse_or_exit;

#[tokio::main]
async fn main() {
    let args: BookmarksArgs = parse_or_exit(1);
    std::process::exit(app::bookmarks::run(args).await);
}
