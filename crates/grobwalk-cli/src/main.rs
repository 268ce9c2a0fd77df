//! Grobwalk CLI: the `grobwalk` command.

mod cli;
mod commands;
mod logging;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    if let Err(e) = logging::init_tracing() {
        eprintln!("warning: {e}");
    }
    let cli = Cli::parse();

    match cli.command {
        Commands::Walk {
            vars,
            polys,
            start,
            target,
            variant,
            start_degree,
            target_degree,
            perturbation_vars,
            radius,
            seed,
            max_depth,
            max_pairs,
            json,
        } => commands::walk::run(commands::walk::Args {
            vars,
            polys,
            start,
            target,
            variant,
            start_degree,
            target_degree,
            perturbation_vars,
            radius,
            seed,
            max_depth,
            max_pairs,
            json,
        }),

        Commands::Run { path, json } => commands::run::run(path, json),

        Commands::Cone {
            vars,
            polys,
            weight,
            json,
        } => commands::cone::run(vars, polys, weight, json),

        Commands::Samples {
            name,
            variant,
            json,
        } => commands::samples::run(name, variant, json),
    }
}
