use contrib_kit::app;
use contrib_kit::config::ExplainArgs;
use contrib_kit::utils::cli::parse_or_exit;

fn main() {
    let args: ExplainArgs = parse_or_exit(1);
    std::process::exit(app::explain::run(args));
}
