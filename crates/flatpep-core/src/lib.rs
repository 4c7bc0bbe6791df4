//! # flatpep Core Library
//!
//! A library for generating datasets of idealized extended-conformation
//! peptide structures, persisting them in an npz-compatible container, and
//! exporting individual structures as PDB files.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains plain data models (`AtomRecord`,
//!   `StructureBundle`, `StructureDataset`) and the codecs around them: the
//!   ZIP-of-NPY structure container, the fixed-column PDB writer, and the
//!   sequence list loader.
//!
//! - **[`engine`]: The Generation Layer.** Defines the `StructureGenerator`
//!   contract with its scoped sessions, ships a subprocess-backed
//!   implementation, and reports progress for long-running batches.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the `engine` and `core` together into complete procedures:
//!   building a dataset from a sequence list and exporting stored structures.

pub mod core;
pub mod engine;
pub mod workflows;
