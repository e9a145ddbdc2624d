//! # Core Module
//!
//! Stateless building blocks: the atom table and its records, selections over
//! it, coordinate file I/O and the geometric descriptors the engine builds on.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atom records, the multi-frame atom table and its builder
//! - **Selection** ([`selection`]) - Field criteria combined into reusable selections
//! - **File I/O** ([`io`]) - Reading/writing PDB files through the `MolecularFile` trait
//! - **Utilities** ([`utils`]) - Geometry descriptors and residue/element tables

pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
