use clap::{Parser, Subcommand};
use contrib_kit::app;
use contrib_kit::config::{BookmarksArgs, ExplainArgs, MailtrimArgs, PtyArgs};
use contrib_kit::utils::cli::parse_or_exit;

#[derive(Parser)]
#[command(name = "contrib-kit")]
#[command(version, about = "Small standalone command-line utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open an explainshell.com breakdown of a shell command
    Explain(ExplainArgs),
    /// Trim a Unix mbox file to its most recent messages
    Mailtrim(MailtrimArgs),
    /// Run a command as if its output were connected to a terminal
    Pty(PtyArgs),
    /// Convert a list of URLs into a Netscape bookmarks HTML file
    #[command(name = "urls-to-bookmarks", alias = "bookmarks")]
    Bookmarks(BookmarksArgs),
}

fn main() {
    let cli: Cli = parse_or_exit(1);

    let exit_code = match cli.command {
        Command::Explain(args) => app::explain::run(args),
        Command::Mailtrim(args) => app::mailtrim::run(args),
        Command::Pty(args) => app::pty::run(args),
        // 只有書籤工具需要 async runtime；pty 會 fork，不能先啟動 runtime
        Command::Bookmarks(args) => match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(app::bookmarks::run(args)),
            Err(e) => {
                eprintln!("contrib-kit: failed to start async runtime: {}", e);
                1
            }
        },
    };

    std::process::exit(exit_code);
}
