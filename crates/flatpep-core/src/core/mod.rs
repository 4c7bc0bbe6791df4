//! # Core Module
//!
//! Foundational data structures and codecs for peptide structure datasets.
//!
//! ## Overview
//!
//! The core layer is deliberately free of policy: it defines what a generated
//! structure *is* and how it is persisted, but not how it is produced or in
//! what order. Those decisions live in the engine and workflow layers.
//!
//! ## Key Components
//!
//! - [`models`] - Atom records, per-sequence bundles and the keyed dataset
//! - [`io`] - The structure container, PDB output and sequence list input
//! - [`utils`] - Amino-acid identifier tables and small shared helpers

pub mod io;
pub mod models;
pub mod utils;
