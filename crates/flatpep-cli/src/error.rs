use flatpep::core::io::container::ContainerError;
use flatpep::core::io::sequences::SequenceListError;
use flatpep::workflows::build::BuildError;
use flatpep::workflows::export::ExportError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    SequenceList(#[from] SequenceListError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
