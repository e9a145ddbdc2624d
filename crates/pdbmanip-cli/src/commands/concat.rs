use super::{read_structure, write_structure};
use crate::cli::ConcatArgs;
use crate::error::Result;
use pdbmanip::core::models::table::AtomTable;

/// Joins the input files in order. Header records and the unit cell are
/// taken from the first file.
pub fn run(args: ConcatArgs) -> Result<()> {
    let mut tables = Vec::with_capacity(args.inputs.len());
    let mut metadata = None;
    for path in &args.inputs {
        let (table, file_metadata) = read_structure(path)?;
        metadata.get_or_insert(file_metadata);
        tables.push(table);
    }

    let joined = AtomTable::concat(&tables)?;
    write_structure(&args.output, &joined, &metadata.unwrap_or_default())?;

    println!(
        "Joined {} file(s), {} atom(s) in {} chain(s), written to: {}",
        tables.len(),
        joined.len(),
        joined.chains().len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use pdbmanip::core::io::pdb::PdbFile;
    use pdbmanip::core::io::traits::MolecularFile;
    use std::fs;

    const PROTEIN: &str = "\
HEADER    PROTEIN
ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  GLY A   2       3.800   0.000   0.000  1.00  0.00           C
END
";

    const LIGAND: &str = "\
HETATM    1  C1  LIG L   1      10.000   0.000   0.000  1.00  0.00           C
END
";

    const TWO_MODELS: &str = "\
MODEL        1
HETATM    1  C1  LIG L   1      10.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
HETATM    1  C1  LIG L   1      11.000   0.000   0.000  1.00  0.00           C
ENDMDL
END
";

    #[test]
    fn files_are_joined_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let protein = dir.path().join("protein.pdb");
        let ligand = dir.path().join("ligand.pdb");
        let output = dir.path().join("complex.pdb");
        fs::write(&protein, PROTEIN).unwrap();
        fs::write(&ligand, LIGAND).unwrap();

        let args = ConcatArgs {
            inputs: vec![protein, ligand],
            output: output.clone(),
        };
        run(args).unwrap();

        let (joined, metadata) = PdbFile::read_from_path(&output).unwrap();
        let names: Vec<_> = joined.iter().map(|a| (a.name.as_str(), a.chain)).collect();
        assert_eq!(names, vec![("CA", 'A'), ("CA", 'A'), ("C1", 'L')]);
        assert_eq!(joined.residue_count(), 3);
        assert!(metadata.header_lines.iter().any(|l| l.starts_with("HEADER")));
    }

    #[test]
    fn model_counts_must_agree() {
        let dir = tempfile::tempdir().unwrap();
        let protein = dir.path().join("protein.pdb");
        let models = dir.path().join("models.pdb");
        fs::write(&protein, PROTEIN).unwrap();
        fs::write(&models, TWO_MODELS).unwrap();

        let args = ConcatArgs {
            inputs: vec![protein, models],
            output: dir.path().join("out.pdb"),
        };
        assert!(matches!(run(args), Err(CliError::Engine(_))));
    }
}
