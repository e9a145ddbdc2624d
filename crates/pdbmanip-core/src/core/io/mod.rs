//! Provides input/output functionality for coordinate file formats.
//!
//! The [`traits::MolecularFile`] trait is the common interface; [`pdb`]
//! implements it for the fixed-column PDB format, including multi-model files.

pub mod pdb;
pub mod traits;
