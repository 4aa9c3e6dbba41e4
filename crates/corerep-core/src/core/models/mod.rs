//! # Core Models Module
//!
//! Data structures describing the atoms a calculation runs over.
//!
//! - [`element`] - Chemical elements and their atomic numbers
//! - [`atoms`] - The [`atoms::AtomSource`] view used by the engine and an owned
//!   [`atoms::AtomCollection`]

pub mod atoms;
pub mod element;
