use clap::Parser;
use std::process;
use trade_enricher::cli::{self, Args};

fn main() {
    let args = Args::parse();

    match cli::run(args) {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
