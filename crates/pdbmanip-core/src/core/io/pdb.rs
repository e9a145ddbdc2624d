use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::{Atom, RecordType};
use crate::core::models::builder::AtomTableBuilder;
use crate::core::models::table::{AtomTable, TableError};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const MIN_ATOM_LINE_LENGTH: usize = 54;
const SHIFTED_NAME_ELEMENTS: [char; 6] = ['C', 'H', 'O', 'N', 'S', 'P'];

/// Records kept alongside the atom table so they survive a round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// The `CRYST1` line, verbatim.
    pub crystal: Option<String>,
    /// `HEADER`, `TITLE` and `REMARK` lines, verbatim and in file order.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Inconsistent models: {0}")]
    Table(#[from] TableError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Line is too short for ATOM/HETATM record ({length} < 54 chars)")]
    LineTooShort { length: usize },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn optional_char(line: &str, column: usize) -> Option<char> {
    line.get(column..column + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_int<T: FromStr>(
    line: &str,
    line_num: usize,
    (start, end): (usize, usize),
    columns: &'static str,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns,
            value: value.into(),
        },
    })
}

fn parse_float(
    line: &str,
    line_num: usize,
    (start, end): (usize, usize),
    columns: &'static str,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns,
            value: value.into(),
        },
    })
}

/// Like [`parse_float`], but a blank field reads as `0.0`.
fn parse_optional_float(
    line: &str,
    line_num: usize,
    range: (usize, usize),
    columns: &'static str,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, range.0, range.1).is_empty() {
        Ok(0.0)
    } else {
        parse_float(line, line_num, range, columns)
    }
}

fn parse_atom_line(line: &str, line_num: usize, record: RecordType) -> Result<Atom, PdbError> {
    if line.len() < MIN_ATOM_LINE_LENGTH {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort { length: line.len() },
        });
    }

    let serial: usize = parse_int(line, line_num, (6, 11), "7-11")?;
    let res_num: isize = parse_int(line, line_num, (22, 26), "23-26")?;
    let x = parse_float(line, line_num, (30, 38), "31-38")?;
    let y = parse_float(line, line_num, (38, 46), "39-46")?;
    let z = parse_float(line, line_num, (46, 54), "47-54")?;
    let occupancy = parse_optional_float(line, line_num, (54, 60), "55-60")?;
    let b_factor = parse_optional_float(line, line_num, (60, 66), "61-66")?;

    let mut atom = Atom::new(
        slice_and_trim(line, 12, 16),
        slice_and_trim(line, 17, 20),
        optional_char(line, 21).unwrap_or(' '),
        res_num,
        Point3::new(x, y, z),
    );
    atom.serial = serial;
    atom.record = record;
    atom.alt_loc = optional_char(line, 16);
    atom.insertion_code = optional_char(line, 26);
    atom.occupancy = occupancy;
    atom.b_factor = b_factor;
    atom.element = slice_and_trim(line, 76, 78).to_string();
    Ok(atom)
}

/// Pads the atom name so that one-letter element names start in column 14.
fn format_atom_name(name: &str) -> String {
    let shifted = name.len() <= 3
        && name
            .chars()
            .next()
            .is_some_and(|c| SHIFTED_NAME_ELEMENTS.contains(&c));
    if shifted {
        format!(" {name}")
    } else {
        name.to_string()
    }
}

fn write_atom_line(
    writer: &mut impl Write,
    atom: &Atom,
    position: &Point3<f64>,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:<6}{:>5} {:<4}{}{:<3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        atom.record.as_str(),
        atom.serial % 100_000,
        format_atom_name(&atom.name),
        atom.alt_loc.unwrap_or(' '),
        atom.res_name,
        atom.chain,
        atom.res_num,
        atom.insertion_code.unwrap_or(' '),
        position.x,
        position.y,
        position.z,
        atom.occupancy,
        atom.b_factor,
        atom.element,
    )
}

/// Reader and writer for the fixed-column PDB format.
///
/// Only coordinate records are interpreted: `ATOM`/`HETATM` rows, `MODEL`
/// boundaries and the `CRYST1` line. Header and remark lines are carried in
/// [`PdbMetadata`]; everything else is skipped.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(AtomTable, Self::Metadata), Self::Error> {
        let mut builder = AtomTableBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut atom_lines = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                tag @ ("ATOM" | "HETATM") => {
                    let record = RecordType::from_str(tag).unwrap_or_default();
                    builder.add_atom(parse_atom_line(&line, line_num, record)?);
                    atom_lines += 1;
                }
                "MODEL" => {
                    builder.start_frame();
                }
                "CRYST1" => metadata.crystal = Some(line.trim_end().to_string()),
                "HEADER" | "TITLE" | "REMARK" => metadata.header_lines.push(line.trim_end().to_string()),
                "END" => break,
                _ => {}
            }
        }

        if atom_lines == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        let table = builder.build()?;
        debug!(
            atoms = table.len(),
            frames = table.frame_count(),
            "Parsed PDB records"
        );
        Ok((table, metadata))
    }

    fn write_to(
        table: &AtomTable,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{line}")?;
        }
        if let Some(crystal) = &metadata.crystal {
            writeln!(writer, "{crystal}")?;
        }

        if table.frame_count() == 1 {
            for atom in table.iter() {
                write_atom_line(writer, atom, &atom.position)?;
            }
        } else {
            for frame in 0..table.frame_count() {
                writeln!(writer, "MODEL     {:>4}", frame + 1)?;
                let positions = table.frame_positions(frame)?;
                for (atom, position) in table.iter().zip(&positions) {
                    write_atom_line(writer, atom, position)?;
                }
                writeln!(writer, "ENDMDL")?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_table_to(table: &AtomTable, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(table, &PdbMetadata::default(), writer)
    }
}
