//! # Core Models Module
//!
//! Plain data types flowing through a batch run.
//!
//! - [`ids`] - Newtype keys for solutes and solvents
//! - [`adjacency`] - A solute's adjacency-list text blob
//! - [`solvent`] - Abraham solvent coefficients plus auxiliary columns
//! - [`request`] - One ordered (solvent, solute) request

pub mod adjacency;
pub mod ids;
pub mod request;
pub mod solvent;
