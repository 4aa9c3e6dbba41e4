//! # Engine Module
//!
//! The stateful part of the library: a table of pair repulsion units over a whole
//! atom set.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Method selection, derivative order and task granularity
//! - **Pair Table** ([`table`]) - One unit per unordered atom pair, computed in parallel
//! - **Accumulators** ([`accumulator`]) - System-level gradient and Hessian collectors
//! - **Error Handling** ([`error`]) - Initialization and precondition failures
//!
//! A table moves through `Uninitialized`, `Initialized` and `Computed(order)`.
//! Queries are only answered once it has been computed at an order that covers
//! them.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod table;
