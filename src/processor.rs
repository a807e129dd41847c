//! Subprocess-backed [`DataProcessor`].

use std::borrow::Cow;
use std::process::Command;

use crate::driver::DataProcessor;
use crate::error::ProcessingError;
use crate::plan::InvocationParams;

/// Default program used to launch the external entry point.
pub const DEFAULT_PROGRAM: &str = "python";

/// Arguments placed before the named invocation arguments by default.
pub const DEFAULT_ARGS: [&str; 2] = ["-m", "hidden_context.data_utils.add_survey_contexts"];

/// How to launch the external processing entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ProcessorCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProcessorCommand {
    /// Full argument vector for one invocation, excluding the program.
    pub fn argv(&self, params: &InvocationParams) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.extend(params.to_args());
        argv
    }

    /// The invocation as a single command line a POSIX shell would split
    /// back into the same argument vector.
    pub fn command_line(&self, params: &InvocationParams) -> String {
        std::iter::once(self.program.clone())
            .chain(self.argv(params))
            .map(|arg| shell_quote(&arg).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Single-quote an argument unless it only contains shell-safe characters.
pub fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', "'\\''")))
    }
}

/// Runs each invocation as a child process and waits for it to exit.
///
/// The child inherits stdin, stdout and stderr.
#[derive(Clone, Debug, Default)]
pub struct CommandProcessor {
    command: ProcessorCommand,
}

impl CommandProcessor {
    pub fn new(command: ProcessorCommand) -> Self {
        Self { command }
    }
}

impl DataProcessor for CommandProcessor {
    fn process(&mut self, params: &InvocationParams) -> Result<(), ProcessingError> {
        tracing::debug!(command = %self.command.command_line(params), "spawning processor");

        let status = Command::new(&self.command.program)
            .args(self.command.argv(params))
            .status()
            .map_err(|source| ProcessingError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessingError::ExitStatus {
                program: self.command.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{resolve, Mode};
    use crate::plan::{build_plan, PlanOptions};

    fn first_invocation() -> InvocationParams {
        build_plan(&resolve(Mode::PosNeg), &PlanOptions::default())
            .unwrap()
            .remove(0)
    }

    #[test]
    fn default_command_line_targets_python_module() {
        let line = ProcessorCommand::default().command_line(&first_invocation());
        assert_eq!(
            line,
            "python -m hidden_context.data_utils.add_survey_contexts \
             --output_dir data/UltraFeedback_pos_neg_in_context_fixed/ \
             --data_path data/UltraFeedback_pos_neg --data_subset 0 --data_split test \
             --model_type gpt2 --other_subsets pos_neg"
        );
    }

    #[test]
    fn command_line_quotes_unsafe_arguments() {
        let command = ProcessorCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "printf '%s\\n' \"$*\"".to_string()],
        };
        let mut params = first_invocation();
        params.output_dir = "my data/out/".to_string();

        let line = command.command_line(&params);
        assert!(line.starts_with("sh -c 'printf '\\''%s\\n'\\'' \"$*\"' --output_dir 'my data/out/' "));
    }

    #[test]
    fn shell_quote_leaves_plain_words_alone() {
        assert_eq!(shell_quote("data/UltraFeedback_single"), "data/UltraFeedback_single");
        assert_eq!(shell_quote("--model_type"), "--model_type");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut processor = CommandProcessor::new(ProcessorCommand {
            program: "embed-driver-no-such-program".to_string(),
            args: Vec::new(),
        });
        let err = processor.process(&first_invocation()).unwrap_err();
        assert!(matches!(err, ProcessingError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_success() {
        let mut ok = CommandProcessor::new(ProcessorCommand {
            program: "true".to_string(),
            args: Vec::new(),
        });
        assert!(ok.process(&first_invocation()).is_ok());

        let mut failing = CommandProcessor::new(ProcessorCommand {
            program: "false".to_string(),
            args: Vec::new(),
        });
        let err = failing.process(&first_invocation()).unwrap_err();
        assert!(matches!(err, ProcessingError::ExitStatus { .. }));
    }
}
