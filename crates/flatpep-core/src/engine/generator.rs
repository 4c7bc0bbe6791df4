use crate::core::models::atom::AtomRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("could not open a generator session: {0}")]
    Session(String),
    #[error("structure generation failed for sequence '{sequence}': {reason}")]
    Build { sequence: String, reason: String },
    #[error("generator output for sequence '{sequence}' is malformed on line {line}: {detail}")]
    Protocol {
        sequence: String,
        line: usize,
        detail: String,
    },
}

/// One live generation session.
///
/// A session owns whatever state its backend needs (a subprocess, a loaded
/// engine, scratch buffers) and releases it on drop. Dropping is the only
/// teardown path, so resources are reclaimed on success and on error alike.
pub trait GeneratorSession {
    /// Builds the idealized extended-conformation structure for `sequence`.
    ///
    /// Atoms are returned in generation order with one-based, non-decreasing
    /// residue ids.
    fn build_extended(&mut self, sequence: &str) -> Result<Vec<AtomRecord>, GeneratorError>;
}

/// A source of generated peptide structures.
///
/// Generators hand out scoped sessions instead of building directly, so the
/// expensive part of a backend (starting a process, initializing an engine)
/// has an explicit lifetime that callers control. A typical build opens one
/// short-lived session per sequence to keep structures independent of each
/// other; a backend whose sessions are cheap to reset may hand out
/// longer-lived ones.
pub trait StructureGenerator {
    type Session<'a>: GeneratorSession
    where
        Self: 'a;

    /// Opens a fresh session against this generator.
    fn open_session(&mut self) -> Result<Self::Session<'_>, GeneratorError>;
}
