//! Run settings.
//!
//! Settings are layered: CLI flags and environment variables win over a
//! YAML config file, which wins over built-in defaults. The merged result is
//! parsed into a [`RunSettings`] before anything is planned.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DriverError;
use crate::mode::{ModelType, Mode};
use crate::plan::{PlanOptions, DEFAULT_DATA_ROOT, DEFAULT_OTHER_SUBSETS};
use crate::processor::{ProcessorCommand, DEFAULT_ARGS, DEFAULT_PROGRAM};

/// Raw settings, as read from a config file or the command line.
///
/// Every field is optional so layers can be merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    pub mode: Option<String>,
    pub model_type: Option<String>,
    pub other_subsets: Option<String>,
    pub data_root: Option<String>,
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub subsets: Vec<String>,
}

/// Raw processor command. Program and arguments fall back to their
/// defaults independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    pub program: Option<String>,
    /// An explicit empty list means no leading arguments.
    pub args: Option<Vec<String>>,
}

impl ProcessorConfig {
    fn merged_over(self, base: ProcessorConfig) -> ProcessorConfig {
        ProcessorConfig {
            program: self.program.or(base.program),
            args: self.args.or(base.args),
        }
    }

    fn into_command(self) -> Result<ProcessorCommand, DriverError> {
        let program = self
            .program
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        if program.trim().is_empty() {
            return Err(DriverError::InvalidSetting {
                setting: "processor",
                message: "program must not be empty".to_string(),
            });
        }

        Ok(ProcessorCommand {
            program,
            args: self
                .args
                .unwrap_or_else(|| DEFAULT_ARGS.iter().map(|s| s.to_string()).collect()),
        })
    }
}

impl DriverConfig {
    /// Read a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, DriverError> {
        let text = fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| DriverError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `self` on top of `base`; fields set in `self` win.
    pub fn merged_over(self, base: DriverConfig) -> DriverConfig {
        DriverConfig {
            mode: self.mode.or(base.mode),
            model_type: self.model_type.or(base.model_type),
            other_subsets: self.other_subsets.or(base.other_subsets),
            data_root: self.data_root.or(base.data_root),
            processor: self.processor.merged_over(base.processor),
            subsets: if self.subsets.is_empty() {
                base.subsets
            } else {
                self.subsets
            },
        }
    }

    /// Fill in defaults and parse the typed settings.
    pub fn into_settings(self) -> Result<RunSettings, DriverError> {
        let mode: Mode = self
            .mode
            .ok_or(DriverError::MissingSetting("mode"))?
            .parse()?;
        let model_type = match self.model_type {
            Some(name) => name.parse()?,
            None => ModelType::default(),
        };

        let data_root = self
            .data_root
            .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_string());
        if data_root.trim().is_empty() {
            return Err(DriverError::InvalidSetting {
                setting: "data_root",
                message: "must not be empty".to_string(),
            });
        }

        Ok(RunSettings {
            mode,
            plan: PlanOptions {
                data_root,
                model_type,
                other_subsets: self
                    .other_subsets
                    .unwrap_or_else(|| DEFAULT_OTHER_SUBSETS.to_string()),
                subsets: self.subsets,
            },
            processor: self.processor.into_command()?,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub mode: Mode,
    pub plan: PlanOptions,
    pub processor: ProcessorCommand,
}
