//! # Engine Module
//!
//! Numerical operations on atom tables: rigid-body superposition, RMSD,
//! coordinate transforms and distance queries.
//!
//! ## Architecture
//!
//! - **Superposition** ([`alignment`]) - Kabsch and quaternion fits between paired point sets
//! - **Deviation** ([`rmsd`]) - As-is and superposed RMSD
//! - **Transforms** ([`transform`]) - Translation, rotation and principal-axis alignment of tables
//! - **Neighbours** ([`neighbors`]) - k-d tree backed distance-shell queries
//! - **Sequences** ([`sequence`]) - BLOSUM62 global alignment of one-letter sequences
//! - **Chains** ([`chains`]) - Chain-break detection from the CA trace
//! - **Configuration** ([`config`]) - Alignment and RMSD settings with builders
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Point sets are paired by position: the caller is responsible for selecting
//! matching atoms, in the same order, on both sides.

pub mod alignment;
pub mod chains;
pub mod config;
pub mod error;
pub mod neighbors;
pub mod rmsd;
pub mod sequence;
pub mod transform;
