use crate::core::models::table::AtomTable;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Defines the interface for reading and writing coordinate file formats.
///
/// Implementors handle the format-specific parsing and serialization; the
/// path helpers open buffered files and delegate to them.
pub trait MolecularFile {
    /// Format-specific data that does not belong in the atom table.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads an atom table from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(AtomTable, Self::Metadata), Self::Error>;

    /// Writes an atom table and its metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        table: &AtomTable,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes an atom table without metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table_to(table: &AtomTable, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads an atom table from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(AtomTable, Self::Metadata), Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let (table, metadata) = Self::read_from(&mut reader)?;
        info!(
            path = %path.display(),
            atoms = table.len(),
            frames = table.frame_count(),
            "Read coordinate file"
        );
        Ok((table, metadata))
    }

    /// Writes an atom table and metadata to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        table: &AtomTable,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(table, metadata, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), atoms = table.len(), "Saved coordinate file");
        Ok(())
    }

    /// Writes an atom table to a file path without metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_table_to_path<P: AsRef<Path>>(table: &AtomTable, path: P) -> Result<(), Self::Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_table_to(table, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), atoms = table.len(), "Saved coordinate file");
        Ok(())
    }
}
