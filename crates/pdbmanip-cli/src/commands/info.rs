use super::read_structure;
use crate::cli::InfoArgs;
use crate::error::Result;
use pdbmanip::core::models::table::AtomTable;
use pdbmanip::core::utils::geometry::{box_dimensions, centroid};
use pdbmanip::core::utils::residues::is_amino_acid;
use pdbmanip::engine::transform::max_size;
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::{info, warn};

pub fn run(args: InfoArgs) -> Result<()> {
    let (table, metadata) = read_structure(&args.input)?;
    if let Some(crystal) = &metadata.crystal {
        info!("Unit cell record: {}", crystal.trim_end());
    }
    print!("{}", summarize(&table)?);
    Ok(())
}

fn summarize(table: &AtomTable) -> Result<String> {
    let positions = table.positions();
    let mut out = String::new();
    let protein_residues = table
        .iter()
        .filter(|atom| is_amino_acid(&atom.res_name))
        .map(|atom| atom.uniq_resid)
        .collect::<BTreeSet<_>>()
        .len();

    let chains: String = table.chains().into_iter().collect();
    writeln!(out, "Atoms:     {}", table.len())?;
    writeln!(
        out,
        "Residues:  {} ({} amino acid)",
        table.residue_count(),
        protein_residues
    )?;
    writeln!(out, "Chains:    {}", chains.trim())?;
    writeln!(out, "Frames:    {}", table.frame_count())?;

    if let (Some(center), Some(dims)) = (centroid(&positions), box_dimensions(&positions)) {
        writeln!(out, "Centroid:  {:.3} {:.3} {:.3}", center.x, center.y, center.z)?;
        writeln!(out, "Box:       {:.3} {:.3} {:.3}", dims.x, dims.y, dims.z)?;
    }
    match max_size(table) {
        Ok(size) => writeln!(out, "Max size:  {size:.3}")?,
        Err(e) => warn!("Skipping max size: {}", e),
    }

    for (chain, sequence) in table.sequences() {
        writeln!(out, ">{chain}\n{sequence}")?;
    }
    Ok(out)
}
