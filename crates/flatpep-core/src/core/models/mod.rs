//! # Core Models Module
//!
//! This module defines the data structures that represent generated peptide
//! structures, from single atoms up to a whole keyed dataset.
//!
//! ## Key Components
//!
//! - [`atom`] - Single-atom records exchanged with structure generators
//! - [`bundle`] - Per-sequence structures in column-oriented (parallel array) form
//! - [`dataset`] - A keyed collection of bundles plus the recorded build order
//!
//! The models are deliberately plain data: codecs under [`crate::core::io`]
//! decide how they are persisted, and the engine layer decides how they are
//! produced.

pub mod atom;
pub mod bundle;
pub mod dataset;
