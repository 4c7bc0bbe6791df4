//! Structure generation through an external command.
//!
//! The command is described as a program plus an argument template; every
//! occurrence of `{seq}` in an argument is replaced with the sequence being
//! built. One process is spawned per built sequence and must print one atom
//! per line to stdout:
//!
//! ```text
//! <name> <residue_id> <residue_name> <x> <y> <z>
//! ```
//!
//! Fields are whitespace separated. Blank lines and lines starting with `#`
//! are ignored. A non-zero exit status fails the sequence, with the captured
//! stderr carried in the error.

use super::generator::{GeneratorError, GeneratorSession, StructureGenerator};
use crate::core::models::atom::AtomRecord;
use nalgebra::Point3;
use std::process::Command;
use tracing::debug;

/// Placeholder replaced by the sequence in argument templates.
pub const SEQUENCE_PLACEHOLDER: &str = "{seq}";

/// Adapter that runs an external command once per sequence.
#[derive(Debug, Clone)]
pub struct ExternalGenerator {
    program: String,
    args: Vec<String>,
}

impl ExternalGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl StructureGenerator for ExternalGenerator {
    type Session<'a>
        = ExternalSession<'a>
    where
        Self: 'a;

    fn open_session(&mut self) -> Result<ExternalSession<'_>, GeneratorError> {
        Ok(ExternalSession { command: self })
    }
}

/// Session over an [`ExternalGenerator`].
///
/// Holds no process of its own: the command runs to completion inside
/// [`build_extended`](GeneratorSession::build_extended), so there is nothing
/// to tear down beyond the borrow.
pub struct ExternalSession<'a> {
    command: &'a ExternalGenerator,
}

impl GeneratorSession for ExternalSession<'_> {
    fn build_extended(&mut self, sequence: &str) -> Result<Vec<AtomRecord>, GeneratorError> {
        let args: Vec<String> = self
            .command
            .args
            .iter()
            .map(|arg| arg.replace(SEQUENCE_PLACEHOLDER, sequence))
            .collect();
        debug!(program = %self.command.program, ?args, "invoking external structure generator");

        let output = Command::new(&self.command.program)
            .args(&args)
            .output()
            .map_err(|e| GeneratorError::Build {
                sequence: sequence.to_string(),
                reason: format!("failed to launch '{}': {}", self.command.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeneratorError::Build {
                sequence: sequence.to_string(),
                reason: format!(
                    "generator exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
            });
        }

        parse_atom_stream(sequence, &output.stdout)
    }
}

/// Parses the line-per-atom protocol from a generator's stdout.
///
/// Residue ids are checked where they cross into this crate: they must be
/// positive and non-decreasing down the stream.
fn parse_atom_stream(sequence: &str, stdout: &[u8]) -> Result<Vec<AtomRecord>, GeneratorError> {
    let text = String::from_utf8_lossy(stdout);
    let mut atoms = Vec::new();
    let mut last_residue_id = 0i32;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(protocol_error(
                sequence,
                line,
                format!(
                    "expected 6 fields (name, residue id, residue name, x, y, z), found {}",
                    fields.len()
                ),
            ));
        }

        let residue_id: i32 = fields[1].parse().map_err(|_| {
            protocol_error(sequence, line, format!("invalid residue id '{}'", fields[1]))
        })?;
        if residue_id < 1 {
            return Err(protocol_error(
                sequence,
                line,
                format!("residue id must be positive, found {residue_id}"),
            ));
        }
        if residue_id < last_residue_id {
            return Err(protocol_error(
                sequence,
                line,
                format!("residue id {residue_id} decreases after {last_residue_id}"),
            ));
        }
        last_residue_id = residue_id;

        let mut coords = [0.0f32; 3];
        for (slot, field) in coords.iter_mut().zip(&fields[3..6]) {
            *slot = field.parse().map_err(|_| {
                protocol_error(sequence, line, format!("invalid coordinate '{field}'"))
            })?;
        }

        atoms.push(AtomRecord::new(
            fields[0],
            residue_id,
            fields[2],
            Point3::new(coords[0], coords[1], coords[2]),
        ));
    }

    Ok(atoms)
}

fn protocol_error(sequence: &str, line: usize, detail: String) -> GeneratorError {
    GeneratorError::Protocol {
        sequence: sequence.to_string(),
        line,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stream_parsing {
        use super::*;

        #[test]
        fn well_formed_streams_become_atom_records() {
            let stdout = b"# extended conformation\n\
                N 1 ALA 0.0 0.5 -1.25\n\
                CA 1 ALA 1.45 0.5 -1.25\n\
                \n\
                N 2 LYS 2.9 0.5 -1.25\n";

            let atoms = parse_atom_stream("AK", stdout).unwrap();

            assert_eq!(atoms.len(), 3);
            assert_eq!(atoms[0].name, "N");
            assert_eq!(atoms[1].position, Point3::new(1.45, 0.5, -1.25));
            assert_eq!(atoms[2].residue_id, 2);
            assert_eq!(atoms[2].residue_name, "LYS");
        }

        #[test]
        fn empty_output_yields_no_atoms() {
            assert!(parse_atom_stream("A", b"").unwrap().is_empty());
            assert!(parse_atom_stream("A", b"# nothing\n\n").unwrap().is_empty());
        }

        #[test]
        fn wrong_field_count_is_a_protocol_error_with_line() {
            let stdout = b"N 1 ALA 0.0 0.5 -1.25\nCA 1 ALA 1.45\n";

            let err = parse_atom_stream("A", stdout).unwrap_err();

            assert!(matches!(err, GeneratorError::Protocol { line: 2, .. }));
        }

        #[test]
        fn unparsable_numbers_are_protocol_errors() {
            let bad_id = parse_atom_stream("A", b"N one ALA 0 0 0\n").unwrap_err();
            let bad_coord = parse_atom_stream("A", b"N 1 ALA 0 zero 0\n").unwrap_err();

            assert!(matches!(bad_id, GeneratorError::Protocol { line: 1, .. }));
            assert!(matches!(bad_coord, GeneratorError::Protocol { line: 1, .. }));
        }

        #[test]
        fn residue_ids_must_be_positive_and_non_decreasing() {
            let nonpositive = parse_atom_stream("A", b"N 0 ALA 0 0 0\n").unwrap_err();
            let decreasing =
                parse_atom_stream("AA", b"N 2 ALA 0 0 0\nCA 1 ALA 1 0 0\n").unwrap_err();

            assert!(matches!(nonpositive, GeneratorError::Protocol { line: 1, .. }));
            assert!(matches!(decreasing, GeneratorError::Protocol { line: 2, .. }));
        }
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;

        #[test]
        fn placeholder_is_substituted_into_arguments() {
            let mut generator = ExternalGenerator::new(
                "sh",
                vec!["-c".to_string(), "echo {seq} 1 ALA 0.0 0.0 0.0".to_string()],
            );

            let atoms = {
                let mut session = generator.open_session().unwrap();
                session.build_extended("AAK").unwrap()
            };

            assert_eq!(atoms.len(), 1);
            assert_eq!(atoms[0].name, "AAK");
        }

        #[test]
        fn multi_line_output_is_collected() {
            let script = "printf 'N 1 GLY 0.0 0.0 0.0\\nCA 1 GLY 1.45 0.0 0.0\\n'";
            let mut generator =
                ExternalGenerator::new("sh", vec!["-c".to_string(), script.to_string()]);

            let mut session = generator.open_session().unwrap();
            let atoms = session.build_extended("G").unwrap();

            assert_eq!(atoms.len(), 2);
            assert_eq!(atoms[1].name, "CA");
        }

        #[test]
        fn nonzero_exit_carries_stderr_in_the_error() {
            let mut generator = ExternalGenerator::new(
                "sh",
                vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
            );

            let mut session = generator.open_session().unwrap();
            let err = session.build_extended("AAA").unwrap_err();

            match err {
                GeneratorError::Build { sequence, reason } => {
                    assert_eq!(sequence, "AAA");
                    assert!(reason.contains("boom"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn unlaunchable_program_fails_the_sequence() {
            let mut generator =
                ExternalGenerator::new("definitely-not-a-real-binary-4xq", Vec::new());

            let mut session = generator.open_session().unwrap();
            let err = session.build_extended("AAA").unwrap_err();

            assert!(matches!(err, GeneratorError::Build { .. }));
        }
    }
}
