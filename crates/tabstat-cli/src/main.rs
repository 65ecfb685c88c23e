//! tabstat CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};

use tabstat_cli::cli::Cli;
use tabstat_cli::commands::execute;
use tabstat_cli::logging::{init_logging, log_config_from_cli};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let styled = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };
    let exit_code = match execute(&cli.command, styled) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
