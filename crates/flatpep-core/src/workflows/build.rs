use crate::core::io::container::{ContainerError, StructureArchive};
use crate::core::models::bundle::StructureBundle;
use crate::core::models::dataset::{InvalidKeyError, StructureDataset, validate_sequence_key};
use crate::core::utils::identifiers::nonstandard_letters;
use crate::engine::generator::{GeneratorError, GeneratorSession, StructureGenerator};
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Sequences visited, duplicates included.
    pub visited: usize,
    /// Distinct sequences stored.
    pub stored: usize,
    /// Atoms across all stored structures.
    pub total_atoms: usize,
}

/// Builds structures for every sequence and persists them as one container.
///
/// The build is fail-fast: the first generation or key error aborts the whole
/// run, and since the container is only written after every sequence
/// succeeded, a failed build leaves no output file behind.
#[instrument(skip_all, name = "dataset_build")]
pub fn run<G: StructureGenerator>(
    generator: &mut G,
    sequences: &[String],
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<BuildReport, BuildError> {
    let dataset = build_dataset(generator, sequences, reporter)?;
    let report = BuildReport {
        visited: dataset.sequence_order().len(),
        stored: dataset.len(),
        total_atoms: dataset.total_atoms(),
    };
    reporter.report(Progress::Message(format!(
        "Writing {} structure(s) to container...",
        report.stored
    )));
    StructureArchive::write_to_path(&dataset, output)?;
    info!(
        visited = report.visited,
        stored = report.stored,
        atoms = report.total_atoms,
        "dataset build complete"
    );
    Ok(report)
}

/// Builds structures for every sequence into an in-memory dataset.
///
/// Every visited sequence is appended to the dataset's order; revisiting a
/// sequence rebuilds and replaces its stored structure. Sequences with
/// letters outside the twenty standard amino acids are built anyway, on the
/// assumption that the generator backend knows more residue types than this
/// crate does; a warning records the decision.
pub fn build_dataset<G: StructureGenerator>(
    generator: &mut G,
    sequences: &[String],
    reporter: &ProgressReporter,
) -> Result<StructureDataset, BuildError> {
    info!(sequences = sequences.len(), "building structure dataset");
    reporter.report(Progress::TaskStart {
        total_steps: sequences.len() as u64,
    });

    let mut dataset = StructureDataset::new();
    for sequence in sequences {
        validate_sequence_key(sequence)?;
        let unknown = nonstandard_letters(sequence);
        if !unknown.is_empty() {
            warn!(
                sequence = %sequence,
                letters = ?unknown,
                "sequence contains non-standard amino-acid letters"
            );
        }
        reporter.report(Progress::SequenceStart {
            sequence: sequence.clone(),
        });

        // One scoped session per sequence keeps structures independent.
        let atoms = {
            let mut session = generator.open_session()?;
            session.build_extended(sequence)?
        };
        if atoms.is_empty() {
            warn!(sequence = %sequence, "generator returned no atoms");
        }

        let replaced = dataset
            .insert(sequence, StructureBundle::from_atoms(&atoms))?
            .is_some();
        if replaced {
            debug!(sequence = %sequence, "replaced structure for revisited sequence");
        }
        dataset.push_order(sequence);
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use nalgebra::Point3;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StubGenerator {
        structures: HashMap<String, Vec<AtomRecord>>,
        opened: usize,
    }

    struct StubSession<'a> {
        structures: &'a HashMap<String, Vec<AtomRecord>>,
    }

    impl StructureGenerator for StubGenerator {
        type Session<'a>
            = StubSession<'a>
        where
            Self: 'a;

        fn open_session(&mut self) -> Result<StubSession<'_>, GeneratorError> {
            self.opened += 1;
            Ok(StubSession {
                structures: &self.structures,
            })
        }
    }

    impl GeneratorSession for StubSession<'_> {
        fn build_extended(&mut self, sequence: &str) -> Result<Vec<AtomRecord>, GeneratorError> {
            self.structures
                .get(sequence)
                .cloned()
                .ok_or_else(|| GeneratorError::Build {
                    sequence: sequence.to_string(),
                    reason: "no stub structure".to_string(),
                })
        }
    }

    fn atoms(names: &[&str]) -> Vec<AtomRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| AtomRecord::new(name, 1, "ALA", Point3::new(i as f32, 0.0, 0.0)))
            .collect()
    }

    fn stub() -> StubGenerator {
        let mut structures = HashMap::new();
        structures.insert("AAA".to_string(), atoms(&["N", "CA", "C"]));
        structures.insert("AAK".to_string(), atoms(&["N", "CA", "C", "O"]));
        StubGenerator {
            structures,
            opened: 0,
        }
    }

    fn sequence_list(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_writes_a_retrievable_container() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("structures.npz");
        let mut generator = stub();

        let report = run(
            &mut generator,
            &sequence_list(&["AAA", "AAK"]),
            &output,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(
            report,
            BuildReport {
                visited: 2,
                stored: 2,
                total_atoms: 7
            }
        );

        let mut archive = StructureArchive::open(&output).unwrap();
        assert_eq!(archive.sequence_order().unwrap(), ["AAA", "AAK"]);
        assert_eq!(archive.structure("AAA").unwrap().len(), 3);
        assert_eq!(archive.structure("AAK").unwrap().len(), 4);
    }

    #[test]
    fn failed_sequence_aborts_without_writing_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("structures.npz");
        let mut generator = stub();

        let err = run(
            &mut generator,
            &sequence_list(&["AAA", "ZZZ"]),
            &output,
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Generator(_)));
        assert!(!output.exists());
    }

    #[test]
    fn revisited_sequences_are_stored_once_but_ordered_twice() {
        let mut generator = stub();

        let dataset = build_dataset(
            &mut generator,
            &sequence_list(&["AAA", "AAA"]),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.sequence_order(), ["AAA", "AAA"]);
        assert_eq!(generator.opened, 2, "expected one session per visit");
    }

    #[test]
    fn invalid_keys_fail_before_any_generation() {
        let mut generator = stub();

        let err = build_dataset(
            &mut generator,
            &sequence_list(&["sequence_order", "AAA"]),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::InvalidKey(_)));
        assert_eq!(generator.opened, 0);
    }

    #[test]
    fn progress_events_cover_every_sequence() {
        let events: Mutex<Vec<Progress>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let mut generator = stub();

        build_dataset(&mut generator, &sequence_list(&["AAA", "AAK"]), &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert!(matches!(events[0], Progress::TaskStart { total_steps: 2 }));
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(increments, 2);
        assert!(matches!(events.last(), Some(Progress::TaskFinish)));
    }

    #[test]
    fn empty_sequence_list_builds_an_empty_container() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("structures.npz");
        let mut generator = stub();

        let report = run(&mut generator, &[], &output, &ProgressReporter::new()).unwrap();

        assert_eq!(report.visited, 0);
        assert_eq!(report.stored, 0);
        let mut archive = StructureArchive::open(&output).unwrap();
        assert!(archive.sequence_order().unwrap().is_empty());
    }
}
