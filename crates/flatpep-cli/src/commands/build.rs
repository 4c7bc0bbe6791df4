use crate::cli::BuildArgs;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use flatpep::core::io::sequences;
use flatpep::engine::external::ExternalGenerator;
use flatpep::engine::progress::ProgressReporter;
use flatpep::workflows;
use tracing::{info, warn};

pub fn run(args: BuildArgs) -> Result<()> {
    let config = GeneratorConfig::from_file(&args.generator)?;

    info!("Loading sequence list from {:?}", &args.sequences);
    let sequences = sequences::load_sequence_list(&args.sequences)?;
    let loaded = sequences.len();
    let sequences = sequences::stride(sequences, args.stride);
    if args.stride > 1 {
        info!(
            "Striding by {} kept {} of {} sequence(s).",
            args.stride,
            sequences.len(),
            loaded
        );
    }
    if sequences.is_empty() {
        warn!("Sequence list is empty; the container will hold no structures.");
    }

    let mut generator = ExternalGenerator::new(config.generator.program, config.generator.args);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building structures for {} sequence(s)...", sequences.len());
    info!("Invoking the core build workflow...");

    let report = workflows::build::run(&mut generator, &sequences, &args.output, &reporter)?;

    println!(
        "✓ {} structure(s), {} atom(s) written to: {}",
        report.stored,
        report.total_atoms,
        args.output.display()
    );
    if report.visited > report.stored {
        println!(
            "  {} duplicate visit(s) recorded in the build order.",
            report.visited - report.stored
        );
    }

    Ok(())
}
