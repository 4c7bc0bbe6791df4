use crate::cli::InfoArgs;
use crate::error::Result;
use flatpep::core::io::container::StructureArchive;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    info!("Opening container {:?}", &args.container);
    let mut archive = StructureArchive::open(&args.container)?;

    let keys = archive.sequence_keys();
    let order = archive.sequence_order()?;

    println!("Container: {}", args.container.display());
    println!("Stored sequences: {}", keys.len());
    println!("Build order ({} visit(s)):", order.len());
    for (index, sequence) in order.iter().enumerate() {
        println!("  {:>4}. {}", index + 1, sequence);
    }

    if args.atoms {
        println!("Atom counts:");
        for key in &keys {
            let bundle = archive.structure(key)?;
            println!("  {:<24} {:>8} atom(s)", key, bundle.len());
        }
    }

    Ok(())
}
