use crate::utils::error::ToolError;
use clap::Parser;

/// Parse command-line arguments, exiting with `usage_exit_code` on bad usage.
///
/// clap exits with status 2 on usage errors; each tool here has its own
/// documented status instead. `--help` and `--version` still exit 0.
pub fn parse_or_exit<P: Parser>(usage_exit_code: i32) -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            if e.use_stderr() {
                std::process::exit(usage_exit_code);
            }
            std::process::exit(0);
        }
    }
}

/// Log an error and print the user-facing form of it to stderr.
pub fn report_error(tool: &str, e: &ToolError) {
    tracing::error!(
        "{} failed: {} (Category: {:?})",
        tool,
        e,
        e.category()
    );
    tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}: {}", tool, e.user_friendly_message());
}
