//! # Engine Module
//!
//! This module defines how peptide structures are produced: the generator
//! contract, the bundled subprocess backend, and progress reporting for
//! long-running builds.
//!
//! ## Overview
//!
//! Structure generation is the one part of the pipeline that depends on
//! external machinery, so it sits behind a pair of traits. A
//! [`generator::StructureGenerator`] describes a backend; opening it yields a
//! scoped [`generator::GeneratorSession`] that owns the backend's live state
//! and releases it on drop, whether the build succeeded or failed.
//!
//! ## Key Components
//!
//! - [`generator`] - The `StructureGenerator`/`GeneratorSession` traits and error type
//! - [`external`] - A backend that shells out to a command once per sequence
//! - [`progress`] - Callback-based progress events for batch builds

pub mod external;
pub mod generator;
pub mod progress;
