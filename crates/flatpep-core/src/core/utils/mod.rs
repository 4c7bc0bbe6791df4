//! # Core Utilities Module
//!
//! Small helpers shared across the core layer.
//!
//! - [`identifiers`] - Amino-acid letter code tables and sequence checks

pub mod identifiers;
