//! Invocation planning.
//!
//! A plan is the ordered list of calls the driver makes to the external
//! processor: for every subset in resolved order, one call for the test
//! split followed by one for the train split.

use std::fmt;

use serde::Serialize;

use crate::error::DriverError;
use crate::mode::{ModelType, ResolvedConfig};

/// Default directory that holds the UltraFeedback datasets.
pub const DEFAULT_DATA_ROOT: &str = "data";

/// Default value passed through as `--other_subsets`.
pub const DEFAULT_OTHER_SUBSETS: &str = "pos_neg";

/// Dataset partition role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Test,
    Train,
}

impl Split {
    /// Splits in the order they are processed for each subset.
    pub const ORDER: [Split; 2] = [Split::Test, Split::Train];

    pub fn name(&self) -> &'static str {
        match self {
            Split::Test => "test",
            Split::Train => "train",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings that shape every invocation in a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanOptions {
    /// Directory the dataset and output paths are built under.
    pub data_root: String,
    pub model_type: ModelType,
    pub other_subsets: String,
    /// Restrict the plan to these subsets. Empty means all of them.
    pub subsets: Vec<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            model_type: ModelType::default(),
            other_subsets: DEFAULT_OTHER_SUBSETS.to_string(),
            subsets: Vec::new(),
        }
    }
}

/// Parameters of a single call to the external processor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvocationParams {
    pub output_dir: String,
    pub data_path: String,
    pub data_subset: String,
    pub data_split: Split,
    pub model_type: ModelType,
    pub other_subsets: String,
}

impl InvocationParams {
    /// Render as named command-line arguments, in a fixed order.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--output_dir".to_string(),
            self.output_dir.clone(),
            "--data_path".to_string(),
            self.data_path.clone(),
            "--data_subset".to_string(),
            self.data_subset.clone(),
            "--data_split".to_string(),
            self.data_split.name().to_string(),
            "--model_type".to_string(),
            self.model_type.name().to_string(),
            "--other_subsets".to_string(),
            self.other_subsets.clone(),
        ]
    }
}

impl fmt::Display for InvocationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.data_subset, self.data_split)
    }
}

/// Directory the processor writes its output to for a given suffix.
pub fn output_dir(data_root: &str, suffix: &str) -> String {
    format!("{}/UltraFeedback{}_in_context_fixed/", trim_root(data_root), suffix)
}

/// Directory the processor reads its input dataset from.
pub fn data_path(data_root: &str, suffix: &str) -> String {
    format!("{}/UltraFeedback{}", trim_root(data_root), suffix)
}

fn trim_root(data_root: &str) -> &str {
    data_root.trim_end_matches('/')
}

/// Select the subsets to run, keeping the resolved order.
///
/// Fails if the filter names a subset the mode does not have.
pub fn select_subsets<'a>(
    resolved: &'a ResolvedConfig,
    filter: &[String],
) -> Result<Vec<&'a str>, DriverError> {
    if let Some(unknown) = filter.iter().find(|s| !resolved.subsets.contains(s)) {
        return Err(DriverError::UnknownSubset {
            subset: unknown.clone(),
            mode: resolved.mode.name().to_string(),
        });
    }

    Ok(resolved
        .subsets
        .iter()
        .filter(|s| filter.is_empty() || filter.contains(s))
        .map(String::as_str)
        .collect())
}

/// Build the ordered list of invocations for a resolved mode.
pub fn build_plan(
    resolved: &ResolvedConfig,
    opts: &PlanOptions,
) -> Result<Vec<InvocationParams>, DriverError> {
    let subsets = select_subsets(resolved, &opts.subsets)?;
    let output_dir = output_dir(&opts.data_root, &resolved.suffix);
    let data_path = data_path(&opts.data_root, &resolved.suffix);

    let mut plan = Vec::with_capacity(subsets.len() * Split::ORDER.len());
    for subset in subsets {
        for split in Split::ORDER {
            plan.push(InvocationParams {
                output_dir: output_dir.clone(),
                data_path: data_path.clone(),
                data_subset: subset.to_string(),
                data_split: split,
                model_type: opts.model_type,
                other_subsets: opts.other_subsets.clone(),
            });
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{resolve, Mode};

    #[test]
    fn paths_follow_suffix_convention() {
        assert_eq!(
            output_dir("data", "_pos_neg"),
            "data/UltraFeedback_pos_neg_in_context_fixed/"
        );
        assert_eq!(data_path("data", "_pos_neg"), "data/UltraFeedback_pos_neg");
        assert_eq!(output_dir("data", ""), "data/UltraFeedback_in_context_fixed/");
        assert_eq!(data_path("data", ""), "data/UltraFeedback");
    }

    #[test]
    fn trailing_slash_on_root_is_ignored() {
        assert_eq!(data_path("/mnt/data/", "_single"), "/mnt/data/UltraFeedback_single");
        assert_eq!(data_path("/", "_single"), "/UltraFeedback_single");
    }

    #[test]
    fn plan_alternates_test_then_train_per_subset() {
        let plan = build_plan(&resolve(Mode::Single), &PlanOptions::default()).unwrap();
        let pairs: Vec<(&str, Split)> = plan
            .iter()
            .map(|p| (p.data_subset.as_str(), p.data_split))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("8", Split::Test),
                ("8", Split::Train),
                ("4", Split::Test),
                ("4", Split::Train),
                ("2", Split::Test),
                ("2", Split::Train),
                ("1", Split::Test),
                ("1", Split::Train),
            ]
        );
    }

    #[test]
    fn plan_carries_settings_into_every_invocation() {
        let opts = PlanOptions {
            model_type: ModelType::Llama,
            other_subsets: "single".to_string(),
            ..Default::default()
        };
        let plan = build_plan(&resolve(Mode::Set), &opts).unwrap();

        assert_eq!(plan.len(), 30);
        for params in &plan {
            assert_eq!(params.output_dir, "data/UltraFeedback_subset_in_context_fixed/");
            assert_eq!(params.data_path, "data/UltraFeedback_subset");
            assert_eq!(params.model_type, ModelType::Llama);
            assert_eq!(params.other_subsets, "single");
        }
    }

    #[test]
    fn subset_filter_keeps_resolved_order() {
        let opts = PlanOptions {
            subsets: vec!["1".to_string(), "8".to_string()],
            ..Default::default()
        };
        let plan = build_plan(&resolve(Mode::Single), &opts).unwrap();
        let subsets: Vec<&str> = plan.iter().map(|p| p.data_subset.as_str()).collect();
        assert_eq!(subsets, vec!["8", "8", "1", "1"]);
    }

    #[test]
    fn subset_filter_rejects_unknown_subset() {
        let opts = PlanOptions {
            subsets: vec!["honesty".to_string()],
            ..Default::default()
        };
        let err = build_plan(&resolve(Mode::PosNeg), &opts).unwrap_err();
        assert!(matches!(
            err,
            DriverError::UnknownSubset { ref subset, ref mode } if subset == "honesty" && mode == "pos_neg"
        ));
    }

    #[test]
    fn display_names_subset_and_split() {
        let plan = build_plan(&resolve(Mode::Single), &PlanOptions::default()).unwrap();
        assert_eq!(plan[1].to_string(), "8 [train]");
    }

    #[test]
    fn args_use_named_flags_in_fixed_order() {
        let plan = build_plan(&resolve(Mode::UltraFeedback), &PlanOptions::default()).unwrap();
        assert_eq!(
            plan[0].to_args(),
            vec![
                "--output_dir",
                "data/UltraFeedback_in_context_fixed/",
                "--data_path",
                "data/UltraFeedback",
                "--data_subset",
                "helpfulness",
                "--data_split",
                "test",
                "--model_type",
                "gpt2",
                "--other_subsets",
                "pos_neg",
            ]
        );
    }
}
