//! # Workflows Module
//!
//! High-level entry points that tie the core and engine layers together into
//! complete procedures.
//!
//! ## Overview
//!
//! Workflows are what library users call: each one takes plain inputs (paths,
//! sequences, a generator), runs a whole pipeline with progress reporting and
//! logging, and returns a small summary. They hold no state of their own.
//!
//! ## Architecture
//!
//! - **Build Workflow** ([`build`]) - Generate a structure per sequence and
//!   persist the batch as a single container, fail-fast and all-or-nothing.
//! - **Export Workflow** ([`export`]) - Pull one stored structure out of a
//!   container and render it as a PDB file.

pub mod build;
pub mod export;
