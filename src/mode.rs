//! Configuration modes and their subset lookup table.
//!
//! Each [`Mode`] names a family of dataset subsets together with the
//! suffix used to build its data and output directory names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DriverError;

/// A named configuration selecting which subsets to process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The four UltraFeedback rating dimensions.
    UltraFeedback,
    /// Sixteen user types, `0` through `15`.
    PosNeg,
    /// Fifteen non-empty user sets, `1` through `15`.
    Set,
    /// The four single-attribute users.
    Single,
}

impl Mode {
    /// All modes, in table order.
    pub const ALL: [Mode; 4] = [Mode::UltraFeedback, Mode::PosNeg, Mode::Set, Mode::Single];

    /// The name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::UltraFeedback => "ultra_feedback",
            Mode::PosNeg => "pos_neg",
            Mode::Set => "set",
            Mode::Single => "single",
        }
    }

    /// Suffix appended to the base dataset and output directory names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Mode::UltraFeedback => "",
            Mode::PosNeg => "_pos_neg",
            Mode::Set => "_subset",
            Mode::Single => "_single",
        }
    }

    /// Ordered subset identifiers for this mode.
    pub fn subsets(&self) -> Vec<String> {
        match self {
            Mode::UltraFeedback => [
                "helpfulness",
                "honesty",
                "instruction_following",
                "truthfulness",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            Mode::PosNeg => (0..16).map(|i| i.to_string()).collect(),
            Mode::Set => (1..16).map(|i| i.to_string()).collect(),
            Mode::Single => ["8", "4", "2", "1"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| DriverError::InvalidMode(s.to_string()))
    }
}

/// The subsets and path suffix a mode resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub mode: Mode,
    pub subsets: Vec<String>,
    pub suffix: String,
}

/// Resolve a mode into its ordered subset list and suffix.
pub fn resolve(mode: Mode) -> ResolvedConfig {
    ResolvedConfig {
        mode,
        subsets: mode.subsets(),
        suffix: mode.suffix().to_string(),
    }
}

/// Parse a mode name and resolve it in one step.
pub fn resolve_str(name: &str) -> Result<ResolvedConfig, DriverError> {
    name.parse::<Mode>().map(resolve)
}

/// External model family the processor embeds with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Gpt2,
    Llama,
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Gpt2 => "gpt2",
            ModelType::Llama => "llama",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelType {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpt2" => Ok(ModelType::Gpt2),
            "llama" => Ok(ModelType::Llama),
            other => Err(DriverError::UnsupportedModelType(other.to_string())),
        }
    }
}
