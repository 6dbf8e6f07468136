//! linesign - Command-line tool for generating line indicator boards

use std::process::ExitCode;

use linesign::cli;

fn main() -> ExitCode {
    cli::run()
}
