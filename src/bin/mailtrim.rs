use contrib_kit::app::{self, mailtrim::USAGE_EXIT_CODE};
use contrib_kit::config::MailtrimArgs;
use contrib_kit::utils::cli::parse_or_exit;

fn main() {
    let args: MailtrimArgs = parse_or_exit(USAGE_EXIT_CODE);
    std::process::exit(app::mailtrim::run(args));
}
