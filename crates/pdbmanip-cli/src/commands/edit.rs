use super::{read_structure, write_structure};
use crate::cli::EditArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::parser;
use pdbmanip::core::models::table::AtomTable;
use pdbmanip::core::selection::{FieldEdit, Selection};
use pdbmanip::engine::chains;
use tracing::{info, warn};

pub fn run(args: EditArgs, config: &PartialConfig) -> Result<()> {
    if args.assignments.is_empty() && args.fix_chains.is_none() && !args.renumber {
        return Err(CliError::Argument(
            "nothing to do; give --set, --fix-chains or --renumber".to_string(),
        ));
    }
    let edits =
        parser::parse_assignments(&args.assignments).map_err(|e| CliError::Argument(e.to_string()))?;
    let selection = config.resolve_selection(&args.selection)?;
    let (mut table, metadata) = read_structure(&args.input)?;

    let changed = apply(&mut table, &edits, selection.as_ref(), args.fix_chains, args.renumber)?;
    write_structure(&args.output, &table, &metadata)?;

    println!(
        "Edited {} of {} atom(s), written to: {}",
        changed,
        table.len(),
        args.output.display()
    );
    Ok(())
}

/// Applies the assignments to the selected atoms (all atoms without a
/// selection), then chain correction, then residue renumbering. Returns the
/// number of atoms the assignments touched.
fn apply(
    table: &mut AtomTable,
    edits: &[FieldEdit],
    selection: Option<&Selection>,
    fix_chains: Option<f64>,
    renumber: bool,
) -> Result<usize> {
    let mut changed = 0;
    if !edits.is_empty() {
        changed = match selection {
            Some(selection) => {
                let indices = table.index_selection(selection);
                table.edit_fields_at(&indices, edits)
            }
            None => {
                table.edit_fields(edits);
                table.len()
            }
        };
        if changed == 0 {
            warn!("Selection matched no atoms; nothing was assigned.");
        }
        info!(changed, edits = edits.len(), "Field assignments applied");
    }

    if let Some(cutoff) = fix_chains {
        if cutoff <= 0.0 {
            return Err(CliError::Argument(format!(
                "chain cutoff must be positive, got {cutoff}"
            )));
        }
        let segments = chains::correct_chains(table, cutoff)?;
        println!("Found {} continuous chain segment(s):", segments.len());
        for segment in &segments {
            println!(
                "  Chain {}: residues {} to {}",
                segment.chain, segment.first_resid, segment.last_resid
            );
        }
    }

    if renumber || edits.iter().any(FieldEdit::changes_residue_key) {
        table.renumber_residues();
    }
    Ok(changed)
}
