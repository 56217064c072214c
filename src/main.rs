//! hyperlekce entry point
//!
//! Parses arguments and dispatches to the CLI module. Errors are printed to
//! stderr with a non-zero exit code.

use hyperlekce::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
