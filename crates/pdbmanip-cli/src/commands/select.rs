use super::{read_structure, write_structure};
use crate::cli::SelectArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use pdbmanip::core::models::table::AtomTable;
use pdbmanip::core::selection::Selection;
use tracing::{info, warn};

pub fn run(args: SelectArgs, config: &PartialConfig) -> Result<()> {
    let selection = config
        .resolve_selection(&args.selection)?
        .unwrap_or_else(Selection::all);
    let (table, metadata) = read_structure(&args.input)?;

    let selected = extract(&table, &selection, args.drop_altloc, args.reindex);
    if selected.is_empty() {
        warn!("Selection matched no atoms; writing an empty structure.");
    }
    write_structure(&args.output, &selected, &metadata)?;

    println!(
        "Selected {} of {} atom(s), written to: {}",
        selected.len(),
        table.len(),
        args.output.display()
    );
    Ok(())
}

fn extract(table: &AtomTable, selection: &Selection, drop_altloc: bool, reindex: bool) -> AtomTable {
    let mut selected = table.select(selection);
    info!(matched = selected.len(), total = table.len(), "Selection applied");
    if drop_altloc {
        let removed = selected.remove_alternate_locations();
        info!(removed, "Dropped alternate locations");
    }
    if reindex {
        selected.reindex();
        selected.renumber_residues();
    }
    selected
}
