use super::error::EngineError;
use crate::core::models::table::AtomTable;
use crate::core::selection::{FieldEdit, Selection};
use crate::core::utils::geometry::distance;
use tracing::info;

/// Largest CA-CA distance between consecutive residues of one chain.
pub const DEFAULT_CA_CUTOFF: f64 = 4.5;

const CHAIN_IDS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A run of residues found to be covalently continuous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSegment {
    pub chain: char,
    pub first_resid: usize,
    pub last_resid: usize,
}

/// Splits the CA trace of `table` wherever two consecutive alpha carbons are
/// `cutoff` Angstroms apart or more. Each segment lists the `uniq_resid`
/// values it covers, in table order.
pub fn chain_breaks(table: &AtomTable, cutoff: f64) -> Vec<Vec<usize>> {
    let alpha_carbons = table.select(&Selection::alpha_carbons());
    let mut segments: Vec<Vec<usize>> = Vec::new();
    let mut previous = None;
    for atom in alpha_carbons.iter() {
        let continues = previous.is_some_and(|p| distance(&p, &atom.position) < cutoff);
        match segments.last_mut() {
            Some(segment) if continues => segment.push(atom.uniq_resid),
            _ => segments.push(vec![atom.uniq_resid]),
        }
        previous = Some(atom.position);
    }
    segments
}

/// Renames chains from the CA trace: the first continuous segment becomes
/// chain `A`, the next `B`, and so on. Every atom of a residue follows its CA.
/// Atoms of residues without a CA keep their chain.
///
/// # Errors
///
/// Returns [`EngineError::TooManyChains`] when there are more segments than
/// single-character chain identifiers; the table is left unchanged.
pub fn correct_chains(table: &mut AtomTable, cutoff: f64) -> Result<Vec<ChainSegment>, EngineError> {
    let segments = chain_breaks(table, cutoff);
    if segments.len() > CHAIN_IDS.len() {
        return Err(EngineError::TooManyChains(segments.len()));
    }

    let mut assigned = Vec::with_capacity(segments.len());
    for (resids, chain) in segments.iter().zip(CHAIN_IDS.chars()) {
        let (Some(&first_resid), Some(&last_resid)) = (resids.first(), resids.last()) else {
            continue;
        };
        let indices = table.index_selection(&Selection::all().uniq_resids(resids.iter().copied()));
        table.edit_fields_at(&indices, &[FieldEdit::Chain(chain)]);
        info!("Chain: {chain}  Residue: {first_resid} to {last_resid}");
        assigned.push(ChainSegment {
            chain,
            first_resid,
            last_resid,
        });
    }
    Ok(assigned)
}
