// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;

use wheelchair_sentinel::cli::args::{Cli, Commands};
use wheelchair_sentinel::cli::run::run_sentinel;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => run_sentinel(args),
    }
}
