//! # Core Module
//!
//! Stateless building blocks of the repulsion calculation.
//!
//! - **Atom Representation** ([`models`]) - Elements and ordered atom sets
//! - **Parameters** ([`params`]) - Per-element core-core parameter tables, built in or loaded from TOML
//! - **Pair Functions** ([`pair`]) - MNDO and AM1 core-core repulsion with analytic derivatives
//! - **File I/O** ([`io`]) - Reading and writing XYZ geometries

pub mod io;
pub mod models;
pub mod pair;
pub mod params;
