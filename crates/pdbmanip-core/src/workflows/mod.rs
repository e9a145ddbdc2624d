//! # Workflows Module
//!
//! High-level entry points that combine selection, superposition and RMSD
//! into single calls.
//!
//! - **Alignment** ([`align`]) - Fit a mobile table onto a reference on a
//!   selected subset, then move the whole mobile table.
//! - **Sequence alignment** ([`sequence_align`]) - Pair residues through a
//!   BLOSUM62 alignment of the CA traces, then fit on the pairs.
//! - **RMSD** ([`rmsd`]) - Deviation between two tables, for the active frame
//!   or for every frame of a multi-model file.
//!
//! Each workflow reports through `tracing` spans named after the workflow.

pub mod align;
pub mod rmsd;
pub mod sequence_align;
