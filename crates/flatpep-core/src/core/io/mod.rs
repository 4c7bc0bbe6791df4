//! # Core I/O Module
//!
//! Codecs for everything the dataset pipeline reads and writes.
//!
//! ## Key Components
//!
//! - [`npy`] - NPY array members: `f32`/`i32` numerics and fixed-width strings
//! - [`container`] - The ZIP-of-NPY structure container with per-sequence namespaces
//! - [`pdb`] - Fixed-column PDB `ATOM` record writer
//! - [`sequences`] - Sequence list loading (array or text) and striding
//!
//! The container is the persistence format of record: it stays readable by
//! ordinary archive and array tooling, so downstream consumers do not need
//! this crate to open what it writes.

pub mod container;
pub mod npy;
pub mod pdb;
pub mod sequences;
