use crate::core::selection::Selection;
use crate::engine::sequence::GapPenalties;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("Unknown rotation method '{0}' (expected 'kabsch' or 'quaternion')")]
    UnknownMethod(String),
}

/// How the optimal rotation between two point sets is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMethod {
    /// SVD of the cross-covariance matrix with reflection correction.
    #[default]
    Kabsch,
    /// Largest eigenvector of Horn's 4x4 quaternion key matrix.
    Quaternion,
}

impl fmt::Display for RotationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationMethod::Kabsch => f.write_str("kabsch"),
            RotationMethod::Quaternion => f.write_str("quaternion"),
        }
    }
}

impl FromStr for RotationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kabsch" | "svd" => Ok(RotationMethod::Kabsch),
            "quaternion" | "quat" => Ok(RotationMethod::Quaternion),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// Settings for a selection-driven rigid alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Atoms used to compute the fit, applied to both tables.
    pub selection: Selection,
    pub method: RotationMethod,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            selection: Selection::alpha_carbons(),
            method: RotationMethod::default(),
        }
    }
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    selection: Option<Selection>,
    method: Option<RotationMethod>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn method(mut self, method: RotationMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        Ok(AlignmentConfig {
            selection: self
                .selection
                .ok_or(ConfigError::MissingParameter("selection"))?,
            method: self.method.unwrap_or_default(),
        })
    }
}

/// Whether RMSD is measured on the coordinates as they are or after an
/// optimal superposition of the mobile set onto the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RmsdMode {
    #[default]
    AsIs,
    Superposed(RotationMethod),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RmsdConfig {
    pub selection: Selection,
    pub mode: RmsdMode,
}

impl Default for RmsdConfig {
    fn default() -> Self {
        Self {
            selection: Selection::alpha_carbons(),
            mode: RmsdMode::default(),
        }
    }
}

#[derive(Default)]
pub struct RmsdConfigBuilder {
    selection: Option<Selection>,
    mode: Option<RmsdMode>,
}

impl RmsdConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn mode(mut self, mode: RmsdMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<RmsdConfig, ConfigError> {
        Ok(RmsdConfig {
            selection: self
                .selection
                .ok_or(ConfigError::MissingParameter("selection"))?,
            mode: self.mode.unwrap_or_default(),
        })
    }
}

/// Settings for an alignment whose atom pairs come from a sequence alignment
/// of the two CA traces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceAlignmentConfig {
    /// Chains read from the mobile table, in this order. Empty means every
    /// chain in table order.
    pub mobile_chains: Vec<char>,
    /// Chains read from the reference table, same convention.
    pub reference_chains: Vec<char>,
    pub method: RotationMethod,
    pub gaps: GapPenalties,
}

#[derive(Default)]
pub struct SequenceAlignmentConfigBuilder {
    mobile_chains: Vec<char>,
    reference_chains: Vec<char>,
    method: Option<RotationMethod>,
    gaps: Option<GapPenalties>,
}

impl SequenceAlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mobile_chains(mut self, chains: impl IntoIterator<Item = char>) -> Self {
        self.mobile_chains = chains.into_iter().collect();
        self
    }
    pub fn reference_chains(mut self, chains: impl IntoIterator<Item = char>) -> Self {
        self.reference_chains = chains.into_iter().collect();
        self
    }
    pub fn method(mut self, method: RotationMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn gaps(mut self, gaps: GapPenalties) -> Self {
        self.gaps = Some(gaps);
        self
    }

    pub fn build(self) -> Result<SequenceAlignmentConfig, ConfigError> {
        let gaps = self.gaps.unwrap_or_default();
        if gaps.open > 0 || gaps.extend > 0 {
            return Err(ConfigError::InvalidParameter(
                "gap penalties must be zero or negative",
            ));
        }
        Ok(SequenceAlignmentConfig {
            mobile_chains: self.mobile_chains,
            reference_chains: self.reference_chains,
            method: self.method.unwrap_or_default(),
            gaps,
        })
    }
}
