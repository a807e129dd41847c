//! Sequential execution of an invocation plan.
//!
//! The driver hands each planned invocation to a [`DataProcessor`], one at a
//! time and in plan order. It never retries and never runs two invocations
//! at once.

mod report;

pub use report::{InvocationRecord, Outcome, RunReport};

use crate::error::{DriverError, ProcessingError};
use crate::plan::InvocationParams;

/// Something that can process one (subset, split) pair.
pub trait DataProcessor {
    fn process(&mut self, params: &InvocationParams) -> Result<(), ProcessingError>;
}

/// What to do when an invocation fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure; the rest of the plan is skipped.
    #[default]
    FailFast,
    /// Record the failure and carry on with the next invocation.
    KeepGoing,
}

/// Execute a plan against a processor.
///
/// Returns the report on success, or [`DriverError::RunFailed`] carrying
/// the report if any invocation failed.
pub fn run<P: DataProcessor + ?Sized>(
    plan: &[InvocationParams],
    processor: &mut P,
    policy: FailurePolicy,
) -> Result<RunReport, DriverError> {
    let mut report = RunReport::new();
    let total = plan.len();

    tracing::info!(invocations = total, ?policy, "starting run");

    let mut invocations = plan.iter().enumerate();
    for (idx, params) in invocations.by_ref() {
        tracing::info!("invocation {}/{}: {}", idx + 1, total, params);

        match processor.process(params) {
            Ok(()) => report.add(InvocationRecord::new(params, Outcome::Succeeded)),
            Err(err) => {
                tracing::warn!(invocation = %params, error = %err, "invocation failed");
                report.add(InvocationRecord::new(
                    params,
                    Outcome::Failed {
                        message: err.to_string(),
                    },
                ));
                if policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }
    }

    for (_, params) in invocations {
        report.add(InvocationRecord::new(params, Outcome::Skipped));
    }

    if report.is_ok() {
        tracing::info!(succeeded = report.succeeded_count(), "run finished");
        Ok(report)
    } else {
        Err(DriverError::RunFailed {
            failed: report.failed_count(),
            skipped: report.skipped_count(),
            report,
        })
    }
}
