pub mod geometry;
pub mod residues;
