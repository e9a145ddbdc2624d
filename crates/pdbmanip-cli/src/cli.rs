use crate::utils::parser::parse_vector3;
use clap::{Args, Parser, Subcommand};
use nalgebra::Vector3;
use pdbmanip::engine::config::RotationMethod;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "pdbmanip - Read, select, transform, superpose and compare PDB coordinate files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file in TOML format with default selection and method settings
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of a structure: counts, sequences, centroid and box size.
    Info(InfoArgs),
    /// Write the atoms matching a selection to a new file.
    Select(SelectArgs),
    /// Translate, rotate or center a structure.
    Transform(TransformArgs),
    /// Change record fields, or rename chains from breaks in the CA trace.
    Edit(EditArgs),
    /// Superpose a mobile structure onto a reference and write the result.
    Align(AlignArgs),
    /// Compute the RMSD between two structures, per model for multi-model files.
    Rmsd(RmsdArgs),
    /// Join several structures into one file.
    Concat(ConcatArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Selection criterion, repeatable. Values are comma-separated or an
    /// inclusive 'min:max' range. Example: -s chain=A -s res_num=10:50
    #[arg(short = 's', long = "select", value_name = "FIELD=VALUES", allow_hyphen_values = true)]
    pub selection: Vec<String>,

    /// Drop alternate locations other than the first ('A').
    #[arg(long)]
    pub drop_altloc: bool,

    /// Renumber atom serials and residue counters in the output.
    #[arg(long)]
    pub reindex: bool,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Move the center of mass to the origin before any other operation.
    #[arg(long)]
    pub center: bool,

    /// Rotate so that a principal axis (0, 1 or 2, by decreasing moment of inertia)
    /// lies along z. Implies centering.
    #[arg(long, value_name = "AXIS", conflicts_with = "center")]
    pub principal_axis: Option<usize>,

    /// Rotation about the origin as Euler angles in degrees, applied as Rx·Ry·Rz.
    #[arg(long, value_name = "AX,AY,AZ", value_parser = parse_vector3, allow_hyphen_values = true)]
    pub rotate: Option<Vector3<f64>>,

    /// Translation vector in Angstroms, applied last.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vector3, allow_hyphen_values = true)]
    pub translate: Option<Vector3<f64>>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Field assignment, repeatable. Example: --set chain=B --set res_name=LIG
    #[arg(long = "set", value_name = "FIELD=VALUE", allow_hyphen_values = true)]
    pub assignments: Vec<String>,

    /// Restrict the assignments to atoms matching these criteria.
    #[arg(short = 's', long = "select", value_name = "FIELD=VALUES", allow_hyphen_values = true)]
    pub selection: Vec<String>,

    /// Rename chains A, B, ... wherever consecutive CA atoms are this far apart
    /// or more (default 4.5 A).
    #[arg(long, value_name = "CUTOFF", num_args = 0..=1, default_missing_value = "4.5")]
    pub fix_chains: Option<f64>,

    /// Recompute residue counters after editing chains or residue numbers.
    #[arg(long)]
    pub renumber: bool,
}

#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Input PDB files, joined in the order given. Repeat -i for each file.
    #[arg(short, long = "input", required = true, value_name = "PATH", num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Path for the joined PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Path to the mobile PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the reference PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Path for the aligned output PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Rotation method, overriding the config file ('kabsch' or 'quaternion').
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<RotationMethod>,

    /// Atoms used for the fit, overriding the config file. Defaults to name=CA.
    #[arg(
        short = 's',
        long = "select",
        value_name = "FIELD=VALUES",
        allow_hyphen_values = true,
        conflicts_with = "by_sequence"
    )]
    pub selection: Vec<String>,

    /// Pair residues through a sequence alignment of the two CA traces instead
    /// of by position.
    #[arg(long)]
    pub by_sequence: bool,

    /// Chains of the mobile structure used with --by-sequence (all by default).
    #[arg(long, value_name = "IDS", value_delimiter = ',', requires = "by_sequence")]
    pub mobile_chains: Vec<char>,

    /// Chains of the reference structure used with --by-sequence (all by default).
    #[arg(long, value_name = "IDS", value_delimiter = ',', requires = "by_sequence")]
    pub reference_chains: Vec<char>,
}

#[derive(Args, Debug)]
pub struct RmsdArgs {
    /// Path to the mobile PDB file; every model is compared.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the reference PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Superpose before measuring, overriding the config file.
    #[arg(long)]
    pub superpose: bool,

    /// Rotation method used with --superpose.
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<RotationMethod>,

    /// Write the per-model values to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Atoms compared, overriding the config file. Defaults to name=CA.
    #[arg(short = 's', long = "select", value_name = "FIELD=VALUES", allow_hyphen_values = true)]
    pub selection: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_transform_with_negative_vectors() {
        let cli = Cli::parse_from([
            "pdbmanip",
            "transform",
            "-i",
            "in.pdb",
            "-o",
            "out.pdb",
            "--translate",
            "-1.5,0,2",
            "--rotate",
            "0,0,-90",
        ]);
        let Commands::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.translate, Some(Vector3::new(-1.5, 0.0, 2.0)));
        assert_eq!(args.rotate, Some(Vector3::new(0.0, 0.0, -90.0)));
        assert!(!args.center);
    }

    #[test]
    fn parses_align_with_global_flags() {
        let cli = Cli::parse_from([
            "pdbmanip", "-vv", "align", "-i", "a.pdb", "-r", "b.pdb", "-o", "c.pdb", "-m", "quat",
            "-s", "chain=A", "-s", "res_num=-5:10",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Align(args) = cli.command else {
            panic!("expected align");
        };
        assert_eq!(args.method, Some(RotationMethod::Quaternion));
        assert_eq!(args.selection, vec!["chain=A", "res_num=-5:10"]);
    }

    #[test]
    fn parses_sequence_alignment_flags() {
        let cli = Cli::parse_from([
            "pdbmanip", "align", "-i", "a.pdb", "-r", "b.pdb", "-o", "c.pdb", "--by-sequence",
            "--mobile-chains", "A,B", "--reference-chains", "C",
        ]);
        let Commands::Align(args) = cli.command else {
            panic!("expected align");
        };
        assert!(args.by_sequence);
        assert_eq!(args.mobile_chains, vec!['A', 'B']);
        assert_eq!(args.reference_chains, vec!['C']);

        let positional_and_sequence = Cli::try_parse_from([
            "pdbmanip", "align", "-i", "a", "-r", "b", "-o", "c", "--by-sequence", "-s", "name=CA",
        ]);
        assert!(positional_and_sequence.is_err());
    }

    #[test]
    fn parses_edit_with_default_chain_cutoff() {
        let cli = Cli::parse_from([
            "pdbmanip", "edit", "-i", "in.pdb", "-o", "out.pdb", "--set", "chain=B", "--set",
            "res_num=-1", "--fix-chains",
        ]);
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.assignments, vec!["chain=B", "res_num=-1"]);
        assert_eq!(args.fix_chains, Some(4.5));
        assert!(!args.renumber);
    }

    #[test]
    fn parses_concat_inputs_in_order() {
        let cli = Cli::parse_from([
            "pdbmanip", "concat", "-i", "a.pdb", "-i", "b.pdb", "c.pdb", "-o", "out.pdb",
        ]);
        let Commands::Concat(args) = cli.command else {
            panic!("expected concat");
        };
        let names: Vec<_> = args.inputs.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["a.pdb", "b.pdb", "c.pdb"]);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = Cli::try_parse_from([
            "pdbmanip", "rmsd", "-i", "a.pdb", "-r", "b.pdb", "--method", "procrustes",
        ]);
        assert!(result.is_err());
    }
}
