use crate::config::ExplainArgs;
use crate::core::explain::{build_explain_url, explain, SystemBrowser};
use crate::utils::cli::report_error;

pub fn run(args: ExplainArgs) -> i32 {
    let Some(settings) = super::prepare("explain", &args.common) else {
        return 1;
    };
    let base_url = &settings.explain.base_url;

    let result = if args.print {
        build_explain_url(base_url, &args.words).map(|url| println!("{}", url))
    } else {
        explain(base_url, &args.words, &SystemBrowser)
            .map(|url| tracing::info!("Opened {}", url))
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            report_error("explain", &e);
            1
        }
    }
}
