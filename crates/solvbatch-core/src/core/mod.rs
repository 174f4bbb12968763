//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Solute identifiers, solvent parameter records,
//!   adjacency records and pair requests
//! - **File I/O** ([`io`]) - Readers for the three input formats, the estimator's
//!   staging input blob and the final report writer
//!
//! None of the types in this module touch the external estimator; everything here
//! can be exercised purely in memory.

pub mod io;
pub mod models;
