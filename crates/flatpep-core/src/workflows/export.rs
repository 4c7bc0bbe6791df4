use crate::core::io::container::{ContainerError, StructureArchive};
use crate::core::io::pdb;
use crate::core::models::bundle::ArrayLengthMismatch;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("stored arrays for '{key}' are inconsistent: {source}")]
    Bundle {
        key: String,
        source: ArrayLengthMismatch,
    },
    #[error("could not write PDB file '{path}': {source}")]
    Io { path: String, source: io::Error },
}

/// Exports one stored structure from a container to a PDB file.
///
/// Returns the number of atoms written.
#[instrument(skip_all, name = "pdb_export")]
pub fn run(
    container: &Path,
    key: &str,
    output: &Path,
    chain_id: char,
) -> Result<usize, ExportError> {
    let mut archive = StructureArchive::open(container)?;
    let bundle = archive.structure(key)?;
    let atoms = bundle.atom_records().map_err(|source| ExportError::Bundle {
        key: key.to_string(),
        source,
    })?;
    pdb::write_atoms_to_path(output, &atoms, chain_id).map_err(|source| ExportError::Io {
        path: output.to_string_lossy().to_string(),
        source,
    })?;
    info!(key, atoms = atoms.len(), path = %output.display(), "exported structure to PDB");
    Ok(atoms.len())
}
