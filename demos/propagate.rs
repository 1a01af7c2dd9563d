//! Posts a small model of a count and a maximum constraint, makes a decision which leads to a
//! conflict and learns a clause from it.
//!
//! ```text
//! cargo run --example propagate -- --verbose --resolution no-learning
//! ```

use std::io::Write;

use clap::Parser;
use kestrel::constraints;
use kestrel::constraints::Constraint;
use kestrel::statistic_logger;
use kestrel::ConflictResolutionStrategy;
use kestrel::EngineOptions;
use kestrel::PropagationEngine;
use kestrel::VariableId;
use log::info;
use log::warn;
use log::LevelFilter;

#[derive(Debug, Parser)]
struct Cli {
    /// Log the steps of the engine.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print the statistics of the engine when done.
    #[arg(short = 's', long = "statistics")]
    log_statistics: bool,

    /// The conflict resolution strategy to use.
    #[arg(short = 'C', long = "resolution", value_enum, default_value_t)]
    conflict_resolution: ConflictResolutionStrategy,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    statistic_logger::configure(log_statistics, "%%", None);

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "% {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
}

fn print_domains(engine: &PropagationEngine, variables: &[VariableId]) {
    for &variable in variables {
        info!("{} = {}", engine.describe(variable), engine.domain(variable));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.log_statistics);

    let mut engine = PropagationEngine::new(EngineOptions {
        conflict_resolver: cli.conflict_resolution,
    });

    let x1 = engine.new_sparse_variable(&[2, 3], Some("x1".to_owned()));
    let x2 = engine.new_variable(2, 2, Some("x2".to_owned()));
    let x3 = engine.new_sparse_variable(&[2, 4], Some("x3".to_owned()));
    let y = engine.new_variable(0, 2, Some("y".to_owned()));
    let card = engine.new_variable(2, 3, Some("card".to_owned()));
    let max = engine.new_variable(3, 10, Some("max".to_owned()));
    let variables = [x1, x2, x3, y, card, max];

    // exactly `card` of the xs take the value 2, and the largest of x1, x3 and y is `max`
    constraints::count([x1, x2, x3], 2, card).post(&mut engine)?;
    constraints::maximum([x1, x3, y], max).post(&mut engine)?;

    engine.propagate()?;
    info!("Root fixpoint:");
    print_domains(&engine, &variables);

    let checkpoint = engine.checkpoint();
    info!("Deciding card >= 3");
    let _ = engine.tighten_lower_bound(card, 3)?;

    match engine.propagate() {
        Ok(()) => warn!("The decision did not lead to a conflict"),
        Err(conflict) => {
            info!("Conflict: {conflict}");

            match engine.handle_conflict(checkpoint)? {
                Some(learned_clause) => {
                    let literals = learned_clause
                        .literals()
                        .iter()
                        .map(|(variable, allowed)| {
                            format!("{} in {allowed}", engine.describe(*variable))
                        })
                        .collect::<Vec<_>>();
                    info!("Learned {}", literals.join(" \\/ "));
                }
                None => info!("Backtracked without learning"),
            }

            engine.propagate()?;
            info!("Fixpoint after backtracking:");
            print_domains(&engine, &variables);
        }
    }

    engine.log_statistics();
    statistic_logger::log_statistic_postfix();

    Ok(())
}
