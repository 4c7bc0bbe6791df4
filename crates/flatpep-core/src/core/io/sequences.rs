//! Loader for peptide sequence lists.
//!
//! A list is either an NPY string array (byte or Unicode flavored, as
//! produced by common array tooling) or a plain text file with one sequence
//! per line. The format is sniffed from the leading magic bytes, so callers
//! never have to declare which one they are passing.

use super::npy::{self, NpyError};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SequenceListError {
    #[error("sequence list '{path}' could not be read: {source}")]
    Io { path: String, source: io::Error },
    #[error("sequence list '{path}' is not a valid array: {source}")]
    Npy { path: String, source: NpyError },
    #[error("sequence list '{path}' holds {found} data, expected strings")]
    NotStrings { path: String, found: &'static str },
}

/// Loads a sequence list from `path`, sniffing the file format.
///
/// Text input is trimmed per line; blank lines and lines starting with `#`
/// are skipped. Array input must be a flat string array.
pub fn load_sequence_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, SequenceListError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SequenceListError::Io {
        path: display(path),
        source,
    })?;

    let sequences = if bytes.starts_with(npy::MAGIC) {
        let array =
            npy::read_array(&mut bytes.as_slice()).map_err(|source| SequenceListError::Npy {
                path: display(path),
                source,
            })?;
        match array {
            npy::NpyArray::Str { values, .. } => values,
            other => {
                return Err(SequenceListError::NotStrings {
                    path: display(path),
                    found: other.dtype_name(),
                });
            }
        }
    } else {
        let text = String::from_utf8_lossy(&bytes);
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    debug!(count = sequences.len(), path = %path.display(), "loaded sequence list");
    Ok(sequences)
}

/// Keeps every `step`-th sequence, starting with the first.
///
/// A step of zero behaves like one and keeps everything.
pub fn stride(sequences: Vec<String>, step: usize) -> Vec<String> {
    if step <= 1 {
        return sequences;
    }
    sequences.into_iter().step_by(step).collect()
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn text_lists_skip_blanks_and_comments() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "seqs.txt", b"AAA\n\n# comment\n  AAK  \nGGG\n");

        let sequences = load_sequence_list(&path).unwrap();

        assert_eq!(sequences, ["AAA", "AAK", "GGG"]);
    }

    #[test]
    fn byte_string_arrays_are_loaded() {
        let dir = TempDir::new().unwrap();
        let mut bytes = Vec::new();
        npy::write_strings(&mut bytes, &["AAA", "AAK"], 3).unwrap();
        let path = write_file(&dir, "seqs.npy", &bytes);

        let sequences = load_sequence_list(&path).unwrap();

        assert_eq!(sequences, ["AAA", "AAK"]);
    }

    #[test]
    fn unicode_string_arrays_are_loaded() {
        let dir = TempDir::new().unwrap();
        let dict = "{'descr': '<U3', 'fortran_order': False, 'shape': (2,), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"\x93NUMPY\x01\x00");
        bytes.extend_from_slice(&(dict.len() as u16).to_le_bytes());
        bytes.extend_from_slice(dict.as_bytes());
        for value in ["AAK", "G"] {
            let mut cell = [0u32; 3];
            for (slot, ch) in cell.iter_mut().zip(value.chars()) {
                *slot = ch as u32;
            }
            for code in cell {
                bytes.extend_from_slice(&code.to_le_bytes());
            }
        }
        let path = write_file(&dir, "seqs_u.npy", &bytes);

        let sequences = load_sequence_list(&path).unwrap();

        assert_eq!(sequences, ["AAK", "G"]);
    }

    #[test]
    fn numeric_arrays_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut bytes = Vec::new();
        npy::write_i32s(&mut bytes, &[1, 2, 3]).unwrap();
        let path = write_file(&dir, "ids.npy", &bytes);

        let err = load_sequence_list(&path).unwrap_err();

        assert!(matches!(
            err,
            SequenceListError::NotStrings { found: "i32", .. }
        ));
    }

    #[test]
    fn truncated_array_is_an_npy_error() {
        let dir = TempDir::new().unwrap();
        let mut bytes = Vec::new();
        npy::write_strings(&mut bytes, &["AAA", "AAK"], 3).unwrap();
        bytes.truncate(bytes.len() - 2);
        let path = write_file(&dir, "broken.npy", &bytes);

        let err = load_sequence_list(&path).unwrap_err();

        assert!(matches!(err, SequenceListError::Npy { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();

        let err = load_sequence_list(dir.path().join("absent.txt")).unwrap_err();

        assert!(matches!(err, SequenceListError::Io { .. }));
    }

    mod striding {
        use super::*;

        fn seqs(values: &[&str]) -> Vec<String> {
            values.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn keeps_every_nth_starting_with_the_first() {
            let strided = stride(seqs(&["A", "B", "C", "D", "E"]), 2);

            assert_eq!(strided, ["A", "C", "E"]);
        }

        #[test]
        fn step_of_one_and_zero_keep_everything() {
            assert_eq!(stride(seqs(&["A", "B"]), 1), ["A", "B"]);
            assert_eq!(stride(seqs(&["A", "B"]), 0), ["A", "B"]);
        }

        #[test]
        fn step_beyond_length_keeps_only_the_first() {
            assert_eq!(stride(seqs(&["A", "B", "C"]), 10), ["A"]);
        }
    }
}
