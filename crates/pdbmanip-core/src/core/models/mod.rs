//! # Core Models Module
//!
//! The in-memory representation of a coordinate file: an ordered table of
//! atom records with one or more coordinate frames.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom record and its record type
//! - [`table`] - The atom table, frame handling and table errors
//! - [`builder`] - Incremental construction of tables, used by the readers
//!
//! ## Usage
//!
//! ```ignore
//! use pdbmanip::core::models::{atom::Atom, builder::AtomTableBuilder};
//!
//! let mut builder = AtomTableBuilder::new();
//! builder.add_atom(Atom::new("CA", "ALA", 'A', 1, Point3::new(0.0, 0.0, 0.0)));
//! let table = builder.build()?;
//! ```

pub mod atom;
pub mod builder;
pub mod table;
