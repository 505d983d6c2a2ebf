use crate::config::{PtyArgs, PTY_USAGE};

/// Exit status for bad usage and for failures of the wrapper itself.
pub const USAGE_EXIT_CODE: i32 = 255;

pub fn run(args: PtyArgs) -> i32 {
    if args.command.is_empty() {
        eprint!("{}", PTY_USAGE);
        return USAGE_EXIT_CODE;
    }
    let Some(settings) = super::prepare("pty", &args.common) else {
        return USAGE_EXIT_CODE;
    };

    wrap(&args, &settings)
}

#[cfg(unix)]
fn wrap(args: &PtyArgs, settings: &crate::config::Settings) -> i32 {
    use crate::core::pty::PtyWrapper;
    use crate::utils::cli::report_error;

    let buffer_size = args.buffer_size.unwrap_or(settings.pty.buffer_size);
    let wrapper = match PtyWrapper::new(&args.command) {
        Ok(wrapper) => wrapper
            .buffer_size(buffer_size)
            .ignore_interrupt(settings.pty.ignore_interrupt),
        Err(e) => {
            report_error("pty", &e);
            return USAGE_EXIT_CODE;
        }
    };

    let mut out = std::io::stdout().lock();
    match wrapper.run(&mut out) {
        Ok(outcome) => {
            if outcome.downstream_closed {
                tracing::debug!("Output reader closed early");
            }
            outcome.exit_code
        }
        Err(e) => {
            report_error("pty", &e);
            USAGE_EXIT_CODE
        }
    }
}

#[cfg(not(unix))]
fn wrap(_args: &PtyArgs, _settings: &crate::config::Settings) -> i32 {
    eprintln!("pty: pseudo-terminals are only supported on Unix platforms");
    USAGE_EXIT_CODE
}
