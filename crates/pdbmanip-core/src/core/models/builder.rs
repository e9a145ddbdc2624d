use super::atom::Atom;
use super::table::{AtomTable, TableError, assign_residue_ids};
use nalgebra::Point3;

/// Incrementally assembles an [`AtomTable`].
///
/// Atoms added before the first call to [`start_frame`](Self::start_frame)
/// define the table's topology. After that, every added atom only contributes
/// its position to the current frame; the record fields are assumed to match
/// the first frame row by row.
pub struct AtomTableBuilder {
    atoms: Vec<Atom>,
    frames: Vec<Vec<Point3<f64>>>,
}

impl Default for AtomTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomTableBuilder {
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            frames: vec![Vec::new()],
        }
    }

    /// Opens a new frame. Does nothing while the current frame is still empty,
    /// so empty models never produce empty frames.
    pub fn start_frame(&mut self) -> &mut Self {
        if self.frames.last().is_some_and(|f| !f.is_empty()) {
            self.frames.push(Vec::new());
        }
        self
    }

    /// Adds an atom, assigning its table index.
    pub fn add_atom(&mut self, mut atom: Atom) -> &mut Self {
        let position = atom.position;
        if self.frames.len() == 1 {
            atom.index = self.atoms.len();
            self.atoms.push(atom);
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.push(position);
        }
        self
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Finalizes the table with the first frame active.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::FrameSizeMismatch`] if any frame has a different
    /// number of atoms than the first one. A trailing empty frame is dropped.
    pub fn build(mut self) -> Result<AtomTable, TableError> {
        if self.frames.len() > 1 && self.frames.last().is_some_and(Vec::is_empty) {
            self.frames.pop();
        }
        let expected = self.atoms.len();
        if let Some((frame, found)) = self
            .frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.len() != expected)
            .map(|(i, f)| (i, f.len()))
        {
            return Err(TableError::FrameSizeMismatch {
                frame,
                expected,
                found,
            });
        }

        assign_residue_ids(&mut self.atoms);
        Ok(AtomTable {
            atoms: self.atoms,
            frames: self.frames,
            active_frame: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, chain: char, res_num: isize, x: f64) -> Atom {
        Atom::new(name, "ALA", chain, res_num, Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn assigns_indices_and_residue_ids() {
        let mut builder = AtomTableBuilder::new();
        builder
            .add_atom(atom("N", 'A', 5, 0.0))
            .add_atom(atom("CA", 'A', 5, 1.0))
            .add_atom(atom("N", 'A', 6, 2.0))
            .add_atom(atom("N", 'B', 6, 3.0));
        let table = builder.build().unwrap();

        let indices: Vec<usize> = table.iter().map(|a| a.index).collect();
        let resids: Vec<usize> = table.iter().map(|a| a.uniq_resid).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(resids, vec![0, 0, 1, 2]);
    }

    #[test]
    fn insertion_code_starts_a_new_residue() {
        let mut inserted = atom("N", 'A', 52, 1.0);
        inserted.insertion_code = Some('A');
        let mut builder = AtomTableBuilder::new();
        builder.add_atom(atom("N", 'A', 52, 0.0)).add_atom(inserted);
        let table = builder.build().unwrap();
        assert_eq!(table.atoms()[1].uniq_resid, 1);
    }

    #[test]
    fn repeated_residue_after_another_gets_a_new_id() {
        let mut builder = AtomTableBuilder::new();
        builder
            .add_atom(atom("N", 'A', 1, 0.0))
            .add_atom(atom("N", 'A', 2, 1.0))
            .add_atom(atom("N", 'A', 1, 2.0));
        let table = builder.build().unwrap();
        let resids: Vec<usize> = table.iter().map(|a| a.uniq_resid).collect();
        assert_eq!(resids, vec![0, 1, 2]);
    }

    #[test]
    fn frames_share_topology() {
        let mut builder = AtomTableBuilder::new();
        builder
            .add_atom(atom("N", 'A', 1, 0.0))
            .add_atom(atom("CA", 'A', 1, 1.0))
            .start_frame()
            .add_atom(atom("N", 'A', 1, 5.0))
            .add_atom(atom("CA", 'A', 1, 6.0));
        let table = builder.build().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.frame_count(), 2);
        assert_eq!(table.frame_positions(1).unwrap()[1].x, 6.0);
    }

    #[test]
    fn empty_frames_are_skipped() {
        let mut builder = AtomTableBuilder::new();
        builder
            .start_frame()
            .add_atom(atom("N", 'A', 1, 0.0))
            .start_frame()
            .start_frame();
        let table = builder.build().unwrap();
        assert_eq!(table.frame_count(), 1);
    }

    #[test]
    fn frame_size_mismatch_is_reported() {
        let mut builder = AtomTableBuilder::new();
        builder
            .add_atom(atom("N", 'A', 1, 0.0))
            .add_atom(atom("CA", 'A', 1, 1.0))
            .start_frame()
            .add_atom(atom("N", 'A', 1, 5.0));
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            TableError::FrameSizeMismatch {
                frame: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_builder_yields_empty_table() {
        let table = AtomTableBuilder::new().build().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.frame_count(), 1);
    }
}
