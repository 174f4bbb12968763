//! # Workflows Module
//!
//! Top-level entry points for library users.
//!
//! - **Solvation Workflow** ([`solvate`]) - Loads and cross-checks the three input
//!   files, runs one estimator batch per solvent, and assembles the ordered report
//!   together with the batch error summary.

pub mod solvate;
