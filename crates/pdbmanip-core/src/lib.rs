//! # pdbmanip
//!
//! Reading, selecting, transforming, superposing and writing macromolecular
//! coordinate files in PDB format.
//!
//! ## Architecture
//!
//! The library is split in three layers:
//!
//! - **[`core`]: The Foundation.** The [`AtomTable`](core::models::table::AtomTable)
//!   data model with its frames, declarative atom selections, the PDB reader and
//!   writer, and geometric helpers (centroid, center of mass, inertia axes).
//!
//! - **[`engine`]: The Numerics.** Kabsch and quaternion superposition, RMSD,
//!   rigid-body transforms of whole tables and k-d tree distance queries.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as "align this
//!   structure onto that one on its alpha carbons" or "RMSD of every model of
//!   a trajectory", with structured logging.

pub mod core;
pub mod engine;
pub mod workflows;
