pub mod align;
pub mod concat;
pub mod edit;
pub mod info;
pub mod rmsd;
pub mod select;
pub mod transform;

use crate::error::{CliError, Result};
use pdbmanip::core::io::pdb::{PdbFile, PdbMetadata};
use pdbmanip::core::io::traits::MolecularFile;
use pdbmanip::core::models::table::AtomTable;
use std::path::Path;
use tracing::info;

pub(crate) fn read_structure(path: &Path) -> Result<(AtomTable, PdbMetadata)> {
    let (table, metadata) =
        PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    info!(
        "Loaded {} atom(s) in {} frame(s) from {:?}",
        table.len(),
        table.frame_count(),
        path
    );
    Ok((table, metadata))
}

pub(crate) fn write_structure(
    path: &Path,
    table: &AtomTable,
    metadata: &PdbMetadata,
) -> Result<()> {
    PdbFile::write_to_path(table, metadata, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
