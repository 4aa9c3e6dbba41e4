//! # corerep Core Library
//!
//! Pairwise core-core repulsion energies and their Cartesian derivatives for
//! NDDO-type semiempirical methods (MNDO, AM1).
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (elements, atom sets), the
//!   per-element parameter tables, the closed-form pair repulsion functions and
//!   geometry I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful pair table that owns one repulsion
//!   unit per atom pair, computes all pairs in parallel and folds their derivatives
//!   into caller-owned accumulators.
//!
//! - **[`workflows`]: The Public API.** One-shot and incremental drivers that tie
//!   parameters, atoms and the table together and return a report.

pub mod core;
pub mod engine;
pub mod workflows;
