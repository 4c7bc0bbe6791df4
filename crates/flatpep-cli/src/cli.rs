use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "flatpep CLI - A command-line interface for building datasets of idealized extended-conformation peptide structures and exporting them to PDB.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a structure container from a list of peptide sequences.
    Build(BuildArgs),
    /// Inspect a structure container: build order, stored keys, atom counts.
    Info(InfoArgs),
    /// Export one stored structure from a container to a PDB file.
    Export(ExportArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the sequence list (NPY string array or plain text, one sequence per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub sequences: PathBuf,

    /// Path for the output structure container.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to the generator description file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub generator: PathBuf,

    /// Keep only every Nth sequence from the list, starting with the first.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub stride: usize,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the structure container to inspect.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub container: PathBuf,

    /// Also load every structure and report per-sequence atom counts.
    #[arg(long)]
    pub atoms: bool,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the structure container to read from.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub container: PathBuf,

    /// Sequence key of the structure to export.
    #[arg(short, long, required = true, value_name = "KEY")]
    pub sequence: String,

    /// Path for the output PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Chain identifier placed in column 22 of every ATOM record.
    #[arg(long, value_name = "ID", default_value_t = 'A')]
    pub chain: char,
}
