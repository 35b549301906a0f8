//! Kintree CLI - Compute family-tree layouts from JSON relationship lists

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let app = cli::KintreeApp::new();
    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
