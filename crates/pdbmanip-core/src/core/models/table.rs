use super::atom::Atom;
use crate::core::selection::{FieldEdit, Selection};
use crate::core::utils::residues::one_letter_code;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TableError {
    #[error("Frame {frame} has {found} atoms, expected {expected}")]
    FrameSizeMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("Frame {index} is out of range (table has {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("Expected {expected} positions, got {found}")]
    PositionCountMismatch { expected: usize, found: usize },

    #[error("Cannot join tables with {expected} and {found} frames")]
    FrameCountMismatch { expected: usize, found: usize },
}

/// An ordered table of atoms with one or more coordinate frames.
///
/// `atoms` always carries the positions of the active frame. `frames` keeps a
/// snapshot of every frame; the slot of the active frame is only refreshed
/// when another frame is activated, so callers go through
/// [`frame_positions`](Self::frame_positions) rather than reading it directly.
#[derive(Debug, Clone)]
pub struct AtomTable {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) frames: Vec<Vec<Point3<f64>>>,
    pub(crate) active_frame: usize,
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AtomTable {
    fn eq(&self, other: &Self) -> bool {
        if self.atoms != other.atoms
            || self.active_frame != other.active_frame
            || self.frames.len() != other.frames.len()
        {
            return false;
        }
        self.frames
            .iter()
            .zip(&other.frames)
            .enumerate()
            .all(|(i, (a, b))| i == self.active_frame || a == b)
    }
}

impl AtomTable {
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            frames: vec![Vec::new()],
            active_frame: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    /// Looks up an atom by its table index (not its row).
    pub fn find(&self, index: usize) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.index == index)
    }

    pub fn find_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.iter_mut().find(|a| a.index == index)
    }

    // --- Frames ---

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn active_frame(&self) -> usize {
        self.active_frame
    }

    /// Makes frame `index` the active frame.
    ///
    /// The current positions are stored back into the previously active frame
    /// before the new frame is loaded, so edits made to the active frame are
    /// never lost.
    pub fn set_active_frame(&mut self, index: usize) -> Result<(), TableError> {
        if index >= self.frames.len() {
            return Err(TableError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            });
        }
        if index == self.active_frame {
            return Ok(());
        }
        self.frames[self.active_frame] = self.positions();
        for (atom, position) in self.atoms.iter_mut().zip(&self.frames[index]) {
            atom.position = *position;
        }
        self.active_frame = index;
        Ok(())
    }

    pub fn frame_positions(&self, index: usize) -> Result<Vec<Point3<f64>>, TableError> {
        if index == self.active_frame {
            return Ok(self.positions());
        }
        self.frames
            .get(index)
            .cloned()
            .ok_or(TableError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            })
    }

    /// Appends a new frame after the existing ones.
    pub fn add_frame(&mut self, positions: Vec<Point3<f64>>) -> Result<(), TableError> {
        if positions.len() != self.atoms.len() {
            return Err(TableError::FrameSizeMismatch {
                frame: self.frames.len(),
                expected: self.atoms.len(),
                found: positions.len(),
            });
        }
        self.frames.push(positions);
        Ok(())
    }

    /// Runs `edit` once per frame with that frame active, then restores the
    /// frame that was active before the call.
    ///
    /// The first error stops the iteration; frames already visited keep their
    /// edits and the original active frame is still restored.
    pub fn for_each_frame<E, F>(&mut self, mut edit: F) -> Result<(), E>
    where
        E: From<TableError>,
        F: FnMut(&mut AtomTable) -> Result<(), E>,
    {
        let original = self.active_frame;
        let mut outcome = Ok(());
        for frame in 0..self.frames.len() {
            self.set_active_frame(frame)?;
            outcome = edit(self);
            if outcome.is_err() {
                break;
            }
        }
        self.set_active_frame(original)?;
        outcome
    }

    // --- Coordinates ---

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn positions_mut(&mut self) -> impl Iterator<Item = &mut Point3<f64>> {
        self.atoms.iter_mut().map(|a| &mut a.position)
    }

    /// Replaces the positions of the active frame, in table order.
    pub fn set_positions(&mut self, positions: &[Point3<f64>]) -> Result<(), TableError> {
        if positions.len() != self.atoms.len() {
            return Err(TableError::PositionCountMismatch {
                expected: self.atoms.len(),
                found: positions.len(),
            });
        }
        for (atom, position) in self.atoms.iter_mut().zip(positions) {
            atom.position = *position;
        }
        Ok(())
    }

    // --- Selection ---

    /// Returns an independent table holding the atoms that match `selection`.
    ///
    /// Indices, residue ids and every frame are carried over unchanged.
    pub fn select(&self, selection: &Selection) -> AtomTable {
        let rows: Vec<usize> = self
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| selection.matches(atom))
            .map(|(row, _)| row)
            .collect();
        self.take_rows(&rows)
    }

    /// Indices of the atoms matching `selection`, in table order.
    pub fn index_selection(&self, selection: &Selection) -> Vec<usize> {
        self.atoms
            .iter()
            .filter(|atom| selection.matches(atom))
            .map(|atom| atom.index)
            .collect()
    }

    /// Returns a table with the atoms whose index is in `indices`.
    ///
    /// Table order is preserved; unknown indices are ignored.
    pub fn select_indices(&self, indices: &[usize]) -> AtomTable {
        let wanted: HashSet<usize> = indices.iter().copied().collect();
        let rows: Vec<usize> = self
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| wanted.contains(&atom.index))
            .map(|(row, _)| row)
            .collect();
        self.take_rows(&rows)
    }

    /// Distinct unique residue ids of the atoms matching `selection`.
    pub fn residue_ids(&self, selection: &Selection) -> Vec<usize> {
        self.atoms
            .iter()
            .filter(|atom| selection.matches(atom))
            .map(|atom| atom.uniq_resid)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn take_rows(&self, rows: &[usize]) -> AtomTable {
        let atoms: Vec<Atom> = rows.iter().map(|&row| self.atoms[row].clone()).collect();
        let frames = self
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                if i == self.active_frame {
                    atoms.iter().map(|a| a.position).collect()
                } else {
                    rows.iter().map(|&row| frame[row]).collect()
                }
            })
            .collect();
        AtomTable {
            atoms,
            frames,
            active_frame: self.active_frame,
        }
    }

    fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Atom) -> bool,
    {
        let rows: Vec<usize> = self
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| keep(atom))
            .map(|(row, _)| row)
            .collect();
        let removed = self.atoms.len() - rows.len();
        if removed > 0 {
            *self = self.take_rows(&rows);
        }
        removed
    }

    // --- Editing ---

    /// Removes the atoms whose index is in `indices` from every frame.
    ///
    /// Returns the number of atoms removed. Remaining atoms keep their index
    /// and residue id until [`reindex`](Self::reindex) or
    /// [`renumber_residues`](Self::renumber_residues) is called.
    pub fn remove_atoms(&mut self, indices: &[usize]) -> usize {
        let doomed: HashSet<usize> = indices.iter().copied().collect();
        self.retain_rows(|atom| !doomed.contains(&atom.index))
    }

    /// Keeps only the first alternate location of every atom.
    ///
    /// Atoms flagged with an alternate location other than blank or `A` are
    /// dropped, and the flag of the survivors is cleared.
    pub fn remove_alternate_locations(&mut self) -> usize {
        let removed = self.retain_rows(|atom| matches!(atom.alt_loc, None | Some('A')));
        for atom in &mut self.atoms {
            atom.alt_loc = None;
        }
        removed
    }

    /// Resets atom indices to `0..len` and serial numbers to `1..=len`.
    pub fn reindex(&mut self) {
        for (row, atom) in self.atoms.iter_mut().enumerate() {
            atom.index = row;
            atom.serial = row + 1;
        }
    }

    /// Recomputes `uniq_resid` from residue boundaries in table order.
    pub fn renumber_residues(&mut self) {
        assign_residue_ids(&mut self.atoms);
    }

    /// Sets the chain identifier of the atoms whose index is in `indices`.
    pub fn set_chain(&mut self, indices: &[usize], chain: char) {
        self.edit_fields_at(indices, &[FieldEdit::Chain(chain)]);
    }

    /// Applies `edits` to every atom.
    pub fn edit_fields(&mut self, edits: &[FieldEdit]) {
        for atom in &mut self.atoms {
            edits.iter().for_each(|edit| edit.apply(atom));
        }
    }

    /// Applies `edits` to the atoms whose index is in `indices` and returns
    /// how many atoms were changed. Residue ids are left as they are; call
    /// [`renumber_residues`](Self::renumber_residues) after editing chains or
    /// residue numbers if they must follow the new boundaries.
    pub fn edit_fields_at(&mut self, indices: &[usize], edits: &[FieldEdit]) -> usize {
        let targets: HashSet<usize> = indices.iter().copied().collect();
        let mut changed = 0;
        for atom in self.atoms.iter_mut().filter(|a| targets.contains(&a.index)) {
            edits.iter().for_each(|edit| edit.apply(atom));
            changed += 1;
        }
        changed
    }

    /// Joins tables end to end, frame by frame.
    ///
    /// Atom records keep their serials; indices are reassigned to the row
    /// and residue ids are recomputed over the joined table. The first
    /// table's active frame becomes the active frame.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::FrameCountMismatch`] if the tables do not all
    /// have the same number of frames.
    pub fn concat<'a, I>(tables: I) -> Result<AtomTable, TableError>
    where
        I: IntoIterator<Item = &'a AtomTable>,
    {
        let mut tables = tables.into_iter();
        let Some(first) = tables.next() else {
            return Ok(AtomTable::new());
        };
        let frame_count = first.frame_count();
        let mut joined = AtomTable {
            atoms: first.atoms.clone(),
            frames: (0..frame_count)
                .map(|i| first.frame_positions(i))
                .collect::<Result<_, _>>()?,
            active_frame: first.active_frame,
        };
        for table in tables {
            if table.frame_count() != frame_count {
                return Err(TableError::FrameCountMismatch {
                    expected: frame_count,
                    found: table.frame_count(),
                });
            }
            joined.atoms.extend(table.atoms.iter().cloned());
            for (i, frame) in joined.frames.iter_mut().enumerate() {
                frame.extend(table.frame_positions(i)?);
            }
        }
        for (row, atom) in joined.atoms.iter_mut().enumerate() {
            atom.index = row;
            atom.position = joined.frames[joined.active_frame][row];
        }
        assign_residue_ids(&mut joined.atoms);
        Ok(joined)
    }

    // --- Descriptors ---

    /// Chain identifiers in order of first appearance.
    pub fn chains(&self) -> Vec<char> {
        let mut seen = Vec::new();
        for atom in &self.atoms {
            if !seen.contains(&atom.chain) {
                seen.push(atom.chain);
            }
        }
        seen
    }

    pub fn residue_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|a| a.uniq_resid)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// One-letter amino acid sequence of every chain, read from CA atoms.
    ///
    /// Residue names without a one-letter code are written as `X`.
    pub fn sequences(&self) -> BTreeMap<char, String> {
        let mut sequences: BTreeMap<char, String> = BTreeMap::new();
        for atom in self.atoms.iter().filter(|a| a.name == "CA") {
            sequences
                .entry(atom.chain)
                .or_default()
                .push(one_letter_code(&atom.res_name).unwrap_or('X'));
        }
        sequences
    }
}

/// Assigns `uniq_resid` values: starting at 0, incremented each time the
/// `(chain, res_num, insertion_code)` key differs from the previous atom's.
pub(crate) fn assign_residue_ids(atoms: &mut [Atom]) {
    let mut previous = None;
    let mut current = 0usize;
    for atom in atoms.iter_mut() {
        let key = atom.residue_key();
        if previous.is_some_and(|prev| prev != key) {
            current += 1;
        }
        atom.uniq_resid = current;
        previous = Some(key);
    }
}
