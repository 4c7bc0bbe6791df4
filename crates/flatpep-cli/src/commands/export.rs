use crate::cli::ExportArgs;
use crate::error::Result;
use flatpep::workflows;
use tracing::info;

pub fn run(args: ExportArgs) -> Result<()> {
    println!(
        "Exporting '{}' from {}...",
        args.sequence,
        args.container.display()
    );
    info!("Invoking the core export workflow...");

    let atoms = workflows::export::run(&args.container, &args.sequence, &args.output, args.chain)?;

    println!("✓ {} atom(s) written to: {}", atoms, args.output.display());

    Ok(())
}
