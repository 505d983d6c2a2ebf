pub mod toml_config;

use clap::{Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

pub use toml_config::Settings;

/// Flags every tool accepts.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML settings file
    #[arg(long, env = "CONTRIB_KIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub const EXPLAIN_AFTER_HELP: &str = "\
Flags in front of the first word belong to explain itself. To explain a
command line that starts with a dash, put -- before it:

explain --print -- -v ls
";

#[derive(Debug, Clone, Parser)]
#[command(name = "explain")]
#[command(about = "Open an explainshell.com breakdown of a shell command")]
#[command(after_help = EXPLAIN_AFTER_HELP)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the URL instead of opening a browser
    #[arg(long)]
    pub print: bool,

    /// The command line to explain
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "WORDS")]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "mailtrim")]
#[command(about = "Trim a Unix mbox file to its most recent messages")]
pub struct MailtrimArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would be removed without touching the file
    #[arg(long)]
    pub dry_run: bool,

    /// Number of most recent messages to keep
    #[arg(value_name = "NUMBER_TO_KEEP")]
    pub keep: usize,

    /// Path to the mbox file
    #[arg(value_name = "MBOX_FILE")]
    pub mailbox: PathBuf,
}

pub const PTY_USAGE: &str = "\
A tragically beautiful piece of hackery, made to fool programs like ls,
grep, rg, and fd into thinking they're actually connected to a terminal.
Its usage:

pty command [arg1 arg2 ...]

Examples:
pty ls --color -R | less -r
git log -p | pty rg <search terms> | less -r
";

#[derive(Debug, Clone, Parser)]
#[command(name = "pty")]
#[command(about = "Run a command as if its output were connected to a terminal")]
#[command(after_help = PTY_USAGE)]
pub struct PtyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Size of each read from the terminal, in bytes
    #[arg(long, value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// The command to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<OsString>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "urls-to-bookmarks")]
#[command(about = "Convert a list of URLs into a Netscape bookmarks HTML file")]
pub struct BookmarksArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write the bookmarks here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Delay between consecutive requests, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Text file with one URL per line
    #[arg(value_name = "URLS_FILE")]
    pub urls_file: PathBuf,
}
