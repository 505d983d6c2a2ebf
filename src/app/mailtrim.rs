use crate::config::MailtrimArgs;
use crate::core::mailbox::{count_mailbox, trim_mailbox};
use crate::utils::cli::report_error;
use crate::utils::validation::validate_path;

pub const USAGE_EXIT_CODE: i32 = 1;

pub fn run(args: MailtrimArgs) -> i32 {
    let Some(_settings) = super::prepare("mailtrim", &args.common) else {
        return USAGE_EXIT_CODE;
    };

    let path = &args.mailbox;
    if let Err(e) = validate_path("mbox file", &path.to_string_lossy()) {
        report_error("mailtrim", &e);
        return USAGE_EXIT_CODE;
    }
    if !path.exists() {
        eprintln!("ERROR: File {} does not exist", path.display());
        return USAGE_EXIT_CODE;
    }

    println!("Trimming {} to {} messages...", path.display(), args.keep);

    let total = match count_mailbox(path) {
        Ok(total) => total,
        Err(e) => {
            report_error("mailtrim", &e);
            return 1;
        }
    };
    println!("\nThere are {} messages in the mailbox file.", total);

    match trim_mailbox(path, args.keep, args.dry_run) {
        Ok(report) => {
            if report.is_untouched() {
                println!("\nThis file already contains less than the desired number of");
                println!("messages. Nothing to do.");
            } else if args.dry_run {
                println!("\nDry run: would remove {} messages.", report.removed);
            } else {
                println!("\nRemoved {} messages...", report.removed);
            }
            println!("\nDone trimming {}.", path.display());
            0
        }
        Err(e) => {
            report_error("mailtrim", &e);
            1
        }
    }
}
