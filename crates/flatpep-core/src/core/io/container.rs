//! Structure container codec.
//!
//! A container is a ZIP archive of NPY members, readable by standard archive
//! tooling. Each stored sequence owns a namespace of four members:
//!
//! ```text
//! <key>/coordinates.npy    <f4, shape (N, 3)
//! <key>/atom_names.npy     |S6, shape (N,)
//! <key>/residue_ids.npy    <i4, shape (N,)
//! <key>/residue_names.npy  |S6, shape (N,)
//! ```
//!
//! plus one reserved top-level member, `sequence_order.npy`, holding the
//! order in which sequences were visited during the build. Namespacing keys
//! with a separator (instead of flattening them into member name prefixes)
//! keeps every stored key unambiguous; the key rules enforced by
//! [`validate_sequence_key`](crate::core::models::dataset::validate_sequence_key)
//! guarantee no sequence can shadow the reserved member.

use super::npy::{self, NpyArray};
use crate::core::models::bundle::StructureBundle;
use crate::core::models::dataset::{KEY_SEPARATOR, StructureDataset};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Reserved member holding the build visit order.
pub const ORDER_MEMBER: &str = "sequence_order.npy";

/// Stored byte width of atom and residue name cells.
pub const NAME_WIDTH: usize = 6;

/// The four per-sequence members, in stored order.
const FIELDS: [&str; 4] = ["coordinates", "atom_names", "residue_ids", "residue_names"];

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container not found at '{path}'")]
    NotFound { path: String },
    #[error("container '{path}' is not a readable archive: {detail}")]
    Archive { path: String, detail: String },
    #[error("container member '{name}' is not a valid array: {source}")]
    Member {
        name: String,
        source: npy::NpyError,
    },
    #[error("container has no 'sequence_order' entry")]
    MissingOrder,
    #[error("no structure stored for sequence key '{key}'")]
    KeyNotFound { key: String },
    #[error("sequence '{key}' is missing its '{field}' member")]
    MissingField { key: String, field: &'static str },
    #[error("sequence '{key}': '{field}' holds {actual} entries but 'coordinates' holds {expected}")]
    LengthMismatch {
        key: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("file I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
}

/// A structure container opened for reading.
///
/// Lookups are member-granular: asking for one sequence reads only that
/// sequence's four members, not the whole archive.
#[derive(Debug)]
pub struct StructureArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
    members: BTreeSet<String>,
}

impl StructureArchive {
    /// Opens an existing container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(ContainerError::NotFound {
                    path: path.to_string_lossy().to_string(),
                });
            }
            Err(source) => return Err(io_error(&path, source)),
        };
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(&path, e))?;
        let members: BTreeSet<String> = zip.file_names().map(str::to_string).collect();
        debug!(members = members.len(), path = %path.display(), "opened structure container");
        Ok(Self { path, zip, members })
    }

    /// Serializes a dataset to `path`, replacing any existing file.
    ///
    /// Members are written in deterministic order: the visit-order member
    /// first, then each sequence's members in sorted key order. Payloads are
    /// stored uncompressed. The whole dataset is written in one pass; there
    /// is no incremental append mode.
    pub fn write_to_path<P: AsRef<Path>>(
        dataset: &StructureDataset,
        path: P,
    ) -> Result<(), ContainerError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| io_error(path, source))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        // Width of the order cells tracks the longest recorded key.
        let width = dataset
            .sequence_order()
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(1);
        let mut payload = Vec::new();
        npy::write_strings(&mut payload, dataset.sequence_order(), width)
            .map_err(|source| member_error(ORDER_MEMBER.to_string(), source))?;
        add_member(&mut zip, path, ORDER_MEMBER, &payload)?;

        for (key, bundle) in dataset.iter() {
            payload.clear();
            npy::write_points(&mut payload, &bundle.coordinates)
                .map_err(|source| member_error(member_name(key, "coordinates"), source))?;
            add_member(&mut zip, path, &member_name(key, "coordinates"), &payload)?;

            payload.clear();
            npy::write_strings(&mut payload, &bundle.atom_names, NAME_WIDTH)
                .map_err(|source| member_error(member_name(key, "atom_names"), source))?;
            add_member(&mut zip, path, &member_name(key, "atom_names"), &payload)?;

            payload.clear();
            npy::write_i32s(&mut payload, &bundle.residue_ids)
                .map_err(|source| member_error(member_name(key, "residue_ids"), source))?;
            add_member(&mut zip, path, &member_name(key, "residue_ids"), &payload)?;

            payload.clear();
            npy::write_strings(&mut payload, &bundle.residue_names, NAME_WIDTH)
                .map_err(|source| member_error(member_name(key, "residue_names"), source))?;
            add_member(&mut zip, path, &member_name(key, "residue_names"), &payload)?;
        }

        let mut inner = zip.finish().map_err(|e| archive_error(path, e))?;
        inner.flush().map_err(|source| io_error(path, source))?;
        info!(
            sequences = dataset.len(),
            atoms = dataset.total_atoms(),
            path = %path.display(),
            "wrote structure container"
        );
        Ok(())
    }

    /// The path this archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Distinct sequence keys with stored members, in sorted order.
    pub fn sequence_keys(&self) -> Vec<String> {
        let mut keys = BTreeSet::new();
        for name in &self.members {
            if let Some((key, _)) = name.split_once(KEY_SEPARATOR) {
                keys.insert(key.to_string());
            }
        }
        keys.into_iter().collect()
    }

    /// Returns `true` if all four members of `key` are present.
    pub fn contains(&self, key: &str) -> bool {
        FIELDS
            .iter()
            .all(|field| self.members.contains(&member_name(key, field)))
    }

    /// Loads the structure stored under `key`.
    ///
    /// A key with no members at all is reported as [`ContainerError::KeyNotFound`];
    /// a key with only some of its members is a damaged container and is
    /// reported as [`ContainerError::MissingField`].
    pub fn structure(&mut self, key: &str) -> Result<StructureBundle, ContainerError> {
        let names = FIELDS.map(|field| member_name(key, field));
        if names.iter().all(|name| !self.members.contains(name)) {
            return Err(ContainerError::KeyNotFound {
                key: key.to_string(),
            });
        }
        for (&field, name) in FIELDS.iter().zip(&names) {
            if !self.members.contains(name) {
                return Err(ContainerError::MissingField {
                    key: key.to_string(),
                    field,
                });
            }
        }

        let coordinates = self
            .member_array(&names[0])?
            .into_points()
            .map_err(|source| member_error(names[0].clone(), source))?;
        let atom_names = self
            .member_array(&names[1])?
            .into_strings()
            .map_err(|source| member_error(names[1].clone(), source))?;
        let residue_ids = self
            .member_array(&names[2])?
            .into_i32s()
            .map_err(|source| member_error(names[2].clone(), source))?;
        let residue_names = self
            .member_array(&names[3])?
            .into_strings()
            .map_err(|source| member_error(names[3].clone(), source))?;

        let expected = coordinates.len();
        for (field, actual) in [
            ("atom_names", atom_names.len()),
            ("residue_ids", residue_ids.len()),
            ("residue_names", residue_names.len()),
        ] {
            if actual != expected {
                return Err(ContainerError::LengthMismatch {
                    key: key.to_string(),
                    field,
                    expected,
                    actual,
                });
            }
        }

        debug!(key, atoms = expected, "loaded structure bundle");
        Ok(StructureBundle {
            coordinates,
            atom_names,
            residue_ids,
            residue_names,
        })
    }

    /// Reads the recorded visit order.
    pub fn sequence_order(&mut self) -> Result<Vec<String>, ContainerError> {
        if !self.members.contains(ORDER_MEMBER) {
            return Err(ContainerError::MissingOrder);
        }
        self.member_array(ORDER_MEMBER)?
            .into_strings()
            .map_err(|source| member_error(ORDER_MEMBER.to_string(), source))
    }

    fn member_array(&mut self, name: &str) -> Result<NpyArray, ContainerError> {
        let mut entry = self
            .zip
            .by_name(name)
            .map_err(|e| archive_error(&self.path, e))?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| io_error(&self.path, source))?;
        npy::read_array(&mut bytes.as_slice())
            .map_err(|source| member_error(name.to_string(), source))
    }
}

fn member_name(key: &str, field: &str) -> String {
    format!("{key}{KEY_SEPARATOR}{field}.npy")
}

fn add_member<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    payload: &[u8],
) -> Result<(), ContainerError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file(name, options)
        .map_err(|e| archive_error(path, e))?;
    zip.write_all(payload)
        .map_err(|source| io_error(path, source))?;
    Ok(())
}

fn member_error(name: String, source: npy::NpyError) -> ContainerError {
    ContainerError::Member { name, source }
}

fn archive_error(path: &Path, err: ZipError) -> ContainerError {
    match err {
        ZipError::Io(source) => io_error(path, source),
        other => ContainerError::Archive {
            path: path.to_string_lossy().to_string(),
            detail: other.to_string(),
        },
    }
}

fn io_error(path: &Path, source: io::Error) -> ContainerError {
    ContainerError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}
