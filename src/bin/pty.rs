use contrib_kit::app::{self, pty::USAGE_EXIT_CODE};
use contrib_kit::config::PtyArgs;
use contrib_kit::utils::cli::parse_or_exit;

// No async runtime here: the wrapper forks, and a forked child must not
// inherit runtime worker threads.
fn main() {
    let args: PtyArgs = parse_or_exit(USAGE_EXIT_CODE);
    std::process::exit(app::pty::run(args));
}
