//! Provides input/output functionality for molecular geometry files.
//!
//! Formats implement the [`traits::GeometryFile`] trait, which reads into and writes
//! from an [`AtomCollection`](crate::core::models::atoms::AtomCollection).

pub mod traits;
pub mod xyz;
