use std::env;
use std::process::ExitCode;

mod app;

use app::cli::{self, CliCommand};

fn main() -> ExitCode {
    let options = match cli::parse_args(env::args().skip(1)) {
        Ok(CliCommand::Run(options)) => options,
        Ok(CliCommand::Help) => {
            cli::print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", cli::usage_text());
            return ExitCode::from(2);
        }
    };

    match app::bootstrap::build_app(options) {
        Ok(wiring) => app::loop_runner::run(wiring),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
