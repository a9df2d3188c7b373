//! rpcscan CLI entry point.

use clap::Parser;
use rpcscan::cli::{self, Cli, EXIT_ERROR};
use rpcscan::logging;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli::load_options(&cli) {
        Ok(options) => {
            logging::init_logger(options.is_debug());
            match cli::run(&cli, &options) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    EXIT_ERROR
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
