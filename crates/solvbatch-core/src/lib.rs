//! # solvbatch Core Library
//!
//! Batch orchestration for an external Abraham solvation estimator. The library
//! groups many solvent/solute requests by solvent, runs the estimator once per
//! solvent, scrapes the per-solute results out of its text output and reassembles
//! them into a report that follows the original request order.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SoluteId`, `SolventRecord`,
//!   `PairRequest`) and the flat-file formats exchanged with users and with the
//!   estimator (adjacency lists, solvent table, pair list, staging input, report CSV).
//!
//! - **[`engine`]: The Logic Core.** Configuration, error taxonomy, the staging area,
//!   the batch planner, the estimator invoker, the result extractor and the report
//!   assembler. Batch-level failures are accumulated here instead of aborting a run.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a
//!   complete run: precondition checks, sequential batch execution and assembly.

pub mod core;
pub mod engine;
pub mod workflows;
