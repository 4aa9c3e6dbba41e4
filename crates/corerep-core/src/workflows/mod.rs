//! # Workflows Module
//!
//! High-level entry points that run a complete repulsion calculation.
//!
//! - **Repulsion Workflow** ([`repulsion`]) - Builds a pair table for the configured
//!   method, computes it at the requested order and returns energy and derivatives.

pub mod repulsion;
