//! Run report types.
//!
//! A [`RunReport`] records what happened to every planned invocation, so a
//! partial run can be inspected and resumed with a subset filter.

use serde::Serialize;
use std::fmt;

use crate::plan::{InvocationParams, Split};

/// The result of executing a plan.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    /// One entry per planned invocation, in plan order.
    pub invocations: Vec<InvocationRecord>,
}

impl RunReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self {
            invocations: Vec::new(),
        }
    }

    /// Adds a record to the report.
    pub fn add(&mut self, record: InvocationRecord) {
        self.invocations.push(record);
    }

    /// Number of invocations that completed successfully.
    pub fn succeeded_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Succeeded))
    }

    /// Number of invocations that failed.
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Number of invocations that were never executed.
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    /// Returns true if every invocation succeeded.
    pub fn is_ok(&self) -> bool {
        self.invocations
            .iter()
            .all(|r| matches!(r.outcome, Outcome::Succeeded))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.invocations.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invocations.is_empty() {
            return writeln!(f, "Run completed: nothing to do");
        }

        if self.is_ok() {
            writeln!(
                f,
                "Run completed: {} invocation(s) succeeded",
                self.succeeded_count()
            )?;
        } else {
            writeln!(
                f,
                "Run completed with {} succeeded, {} failed, {} skipped:",
                self.succeeded_count(),
                self.failed_count(),
                self.skipped_count()
            )?;
        }
        writeln!(f)?;

        for record in &self.invocations {
            writeln!(f, "  {}", record)?;
        }

        Ok(())
    }
}

/// What happened to a single planned invocation.
#[derive(Clone, Debug, Serialize)]
pub struct InvocationRecord {
    pub data_subset: String,
    pub data_split: Split,
    pub outcome: Outcome,
}

impl InvocationRecord {
    pub fn new(params: &InvocationParams, outcome: Outcome) -> Self {
        Self {
            data_subset: params.data_subset.clone(),
            data_split: params.data_split,
            outcome,
        }
    }
}

impl fmt::Display for InvocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.outcome {
            Outcome::Succeeded => "OK  ",
            Outcome::Failed { .. } => "FAIL",
            Outcome::Skipped => "SKIP",
        };
        write!(f, "[{}] {} {}", tag, self.data_subset, self.data_split)?;
        if let Outcome::Failed { message } = &self.outcome {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Outcome of a planned invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed { message: String },
    /// Not executed because an earlier invocation failed.
    Skipped,
}
