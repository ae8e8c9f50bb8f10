use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use treehash::cli::Cli;
use treehash::hash::{HashRegistry, RunCoordinator, StdoutSink};
use treehash::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if cli.list {
        return list_algorithms(cli.json);
    }

    let config = cli.to_config()?;
    let coordinator = RunCoordinator::new(config, Arc::new(StdoutSink));
    let outcome = coordinator.run();

    debug!(
        computed = outcome.summary.computed,
        reused = outcome.summary.reused,
        skipped = outcome.summary.skipped,
        excluded = outcome.summary.excluded,
        walk_errors = outcome.summary.walk_errors,
        "run finished in {:.2}s",
        outcome.summary.duration.as_secs_f64()
    );

    let summary = outcome.into_result()?;
    // Plain line on stderr, independent of the log level.
    eprintln!("{}", summary);
    Ok(())
}

fn list_algorithms(json: bool) -> Result<()> {
    let algorithms = HashRegistry::list_algorithms();

    if json {
        let rendered = serde_json::to_string_pretty(&algorithms)
            .context("serializing algorithm list")?;
        println!("{}", rendered);
        return Ok(());
    }

    for alg in algorithms {
        let kind = if alg.cryptographic { "cryptographic" } else { "checksum" };
        let marker = if alg.default { " (default)" } else { "" };
        println!("{:<12} {:>4} bits  {}{}", alg.name, alg.output_bits, kind, marker);
    }
    Ok(())
}
