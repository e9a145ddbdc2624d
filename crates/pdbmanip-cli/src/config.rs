use crate::error::{CliError, Result};
use crate::utils::parser;
use pdbmanip::core::selection::Selection;
use pdbmanip::engine::config::{
    AlignmentConfig, AlignmentConfigBuilder, RmsdConfig, RmsdConfigBuilder, RmsdMode,
    RotationMethod, SequenceAlignmentConfig, SequenceAlignmentConfigBuilder,
};
use pdbmanip::engine::sequence::GapPenalties;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct PartialAlignmentConfig {
    method: Option<RotationMethod>,
    gap_open: Option<i32>,
    gap_extension: Option<i32>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct PartialRmsdConfig {
    superpose: Option<bool>,
    method: Option<RotationMethod>,
}

/// Settings read from the `--config` TOML file. Every section is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    selection: Option<Selection>,
    alignment: Option<PartialAlignmentConfig>,
    rmsd: Option<PartialRmsdConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the file when a path was given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The selection from `-s` arguments if any, else the file's `[selection]`.
    pub fn resolve_selection(&self, args: &[String]) -> Result<Option<Selection>> {
        let from_cli =
            parser::parse_selection(args).map_err(|e| CliError::Argument(e.to_string()))?;
        Ok(from_cli.or_else(|| self.selection.clone()))
    }

    pub fn merge_alignment(
        &self,
        selection_args: &[String],
        method: Option<RotationMethod>,
    ) -> Result<AlignmentConfig> {
        let file = self.alignment.clone().unwrap_or_default();
        let selection = self
            .resolve_selection(selection_args)?
            .unwrap_or_else(Selection::alpha_carbons);
        let method = method.or(file.method).unwrap_or_default();

        Ok(AlignmentConfigBuilder::new()
            .selection(selection)
            .method(method)
            .build()?)
    }

    pub fn merge_sequence_alignment(
        &self,
        mobile_chains: &[char],
        reference_chains: &[char],
        method: Option<RotationMethod>,
    ) -> Result<SequenceAlignmentConfig> {
        let file = self.alignment.clone().unwrap_or_default();
        let defaults = GapPenalties::default();
        let gaps = GapPenalties {
            open: file.gap_open.unwrap_or(defaults.open),
            extend: file.gap_extension.unwrap_or(defaults.extend),
        };

        Ok(SequenceAlignmentConfigBuilder::new()
            .mobile_chains(mobile_chains.iter().copied())
            .reference_chains(reference_chains.iter().copied())
            .method(method.or(file.method).unwrap_or_default())
            .gaps(gaps)
            .build()?)
    }

    pub fn merge_rmsd(
        &self,
        selection_args: &[String],
        superpose: bool,
        method: Option<RotationMethod>,
    ) -> Result<RmsdConfig> {
        let file = self.rmsd.clone().unwrap_or_default();
        let selection = self
            .resolve_selection(selection_args)?
            .unwrap_or_else(Selection::alpha_carbons);
        let mode = if superpose || file.superpose.unwrap_or(false) {
            RmsdMode::Superposed(method.or(file.method).unwrap_or_default())
        } else {
            RmsdMode::AsIs
        };

        Ok(RmsdConfigBuilder::new()
            .selection(selection)
            .mode(mode)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[selection]
name = ["CA"]
chain = ["A"]
res_num = { min = 10, max = 50 }

[alignment]
method = "quaternion"

[rmsd]
superpose = true
"#;

    #[test]
    fn parses_every_section() {
        let config = PartialConfig::from_toml(FULL).unwrap();
        let selection = config.selection.clone().unwrap();
        assert_eq!(selection.criteria().len(), 3);
        assert_eq!(
            config.alignment,
            Some(PartialAlignmentConfig {
                method: Some(RotationMethod::Quaternion),
                ..Default::default()
            })
        );
        assert_eq!(config.rmsd.unwrap().superpose, Some(true));
    }

    #[test]
    fn unknown_keys_and_fields_are_rejected() {
        assert!(PartialConfig::from_toml("[alignment]\nmthod = \"kabsch\"\n").is_err());
        assert!(PartialConfig::from_toml("[output]\npath = \"x.pdb\"\n").is_err());
        assert!(PartialConfig::from_toml("[selection]\ncolour = \"red\"\n").is_err());
        assert!(PartialConfig::from_toml("[alignment]\nmethod = \"procrustes\"\n").is_err());
    }

    #[test]
    fn empty_file_gives_builtin_defaults() {
        let config = PartialConfig::from_toml("").unwrap();
        assert_eq!(config.merge_alignment(&[], None).unwrap(), AlignmentConfig::default());
        assert_eq!(config.merge_rmsd(&[], false, None).unwrap(), RmsdConfig::default());
    }

    #[test]
    fn cli_values_override_file_values() {
        let config = PartialConfig::from_toml(FULL).unwrap();

        let from_file = config.merge_alignment(&[], None).unwrap();
        assert_eq!(from_file.method, RotationMethod::Quaternion);
        assert_eq!(from_file.selection.criteria().len(), 3);

        let overridden = config
            .merge_alignment(&["chain=B".to_string()], Some(RotationMethod::Kabsch))
            .unwrap();
        assert_eq!(overridden.method, RotationMethod::Kabsch);
        assert_eq!(overridden.selection, Selection::all().chains(['B']));
    }

    #[test]
    fn superpose_flag_or_file_enables_fitting() {
        let defaults = PartialConfig::default();
        let config = defaults
            .merge_rmsd(&[], true, Some(RotationMethod::Quaternion))
            .unwrap();
        assert_eq!(config.mode, RmsdMode::Superposed(RotationMethod::Quaternion));

        let file = PartialConfig::from_toml(FULL).unwrap();
        let config = file.merge_rmsd(&[], false, None).unwrap();
        assert_eq!(config.mode, RmsdMode::Superposed(RotationMethod::Kabsch));
    }

    #[test]
    fn sequence_alignment_reads_gap_penalties_from_file() {
        let config =
            PartialConfig::from_toml("[alignment]\ngap_open = -10\ngap_extension = -1\n").unwrap();
        let merged = config.merge_sequence_alignment(&['A'], &[], None).unwrap();
        assert_eq!(merged.gaps, GapPenalties { open: -10, extend: -1 });
        assert_eq!(merged.mobile_chains, vec!['A']);
        assert_eq!(merged.method, RotationMethod::Kabsch);

        let defaults = PartialConfig::default()
            .merge_sequence_alignment(&[], &[], Some(RotationMethod::Quaternion))
            .unwrap();
        assert_eq!(defaults.gaps, GapPenalties::default());
        assert_eq!(defaults.method, RotationMethod::Quaternion);

        let positive = PartialConfig::from_toml("[alignment]\ngap_open = 3\n").unwrap();
        assert!(matches!(
            positive.merge_sequence_alignment(&[], &[], None),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn bad_selection_argument_is_an_argument_error() {
        let config = PartialConfig::default();
        assert!(matches!(
            config.merge_alignment(&["chain".to_string()], None),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = PartialConfig::load(Some(file.path())).unwrap();
        assert!(config.selection.is_some());
        assert_eq!(PartialConfig::load(None).unwrap(), PartialConfig::default());

        let missing = PartialConfig::from_file(Path::new("/nonexistent/pdbmanip.toml"));
        assert!(matches!(missing, Err(CliError::Io(_))));
    }
}
