//! Readers and writers for the flat files exchanged with users and with the estimator.
//!
//! The three input formats (adjacency lists, solvent table, pair list) share the
//! [`traits::InputFile`] interface. The estimator's staging blob and the final CSV
//! report are write-only and live in [`estimator`] and [`report`].

pub mod adjacency;
pub mod estimator;
pub mod pair_list;
pub mod report;
pub mod solvent_table;
pub mod table;
pub mod traits;
