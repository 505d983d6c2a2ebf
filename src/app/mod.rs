//! Entry points shared by the standalone binaries and the `contrib-kit`
//! umbrella command. Each `run` returns the process exit status.

pub mod bookmarks;
pub mod explain;
pub mod mailtrim;
pub mod pty;

use crate::config::{CommonArgs, Settings};
use crate::utils::cli::report_error;
use crate::utils::logger;

/// Load settings and initialise logging for one tool invocation.
pub(crate) fn prepare(tool: &str, common: &CommonArgs) -> Option<Settings> {
    match Settings::load(common.config.as_deref()) {
        Ok(settings) => {
            logger::init_cli_logger(common.verbose || settings.logging.verbose);
            tracing::debug!("{} settings: {:?}", tool, settings);
            Some(settings)
        }
        Err(e) => {
            logger::init_cli_logger(common.verbose);
            report_error(tool, &e);
            None
        }
    }
}
