//! # Engine Module
//!
//! The stateful half of a batch run: everything between "the inputs parsed" and
//! "the report rows are known".
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Estimator command line, staging and policy settings
//! - **Error Handling** ([`error`]) - Fatal run errors, separate from per-batch failures
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Staging** ([`staging`]) - Unique per-run and per-batch working directories
//! - **Planning** ([`planner`]) - Grouping of requests into one batch per solvent
//! - **Invocation** ([`invoker`]) - The `Estimator` seam and its external-process implementation
//! - **Extraction** ([`extractor`]) - Best-effort scraping of the estimator's output file
//! - **Results** ([`results`]) - The result table and the append-only batch error log
//! - **Assembly** ([`assembler`]) - Reconciliation of results against request order
//!
//! Batches are executed strictly one at a time by [`batch`]; a failing batch is
//! recorded in the error log and never stops the run.

pub mod assembler;
pub(crate) mod batch;
pub mod config;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod planner;
pub mod progress;
pub mod results;
pub mod staging;
