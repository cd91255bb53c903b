//! Post-install instruction execution
//!
//! Instructions are opaque: they are handed to the runner as-is and never
//! inspected or sanitised here. Whoever writes the configuration owns what
//! the instructions do.

use crate::models::InstructionOutput;
use crate::utils::HookError;
use std::process::Command;

/// Capability to execute an instruction and capture its result
pub trait InstructionRunner {
    fn run_instruction(&self, instruction: &str) -> Result<InstructionOutput, HookError>;
}

impl<T: InstructionRunner + ?Sized> InstructionRunner for &T {
    fn run_instruction(&self, instruction: &str) -> Result<InstructionOutput, HookError> {
        (**self).run_instruction(instruction)
    }
}

impl<T: InstructionRunner + ?Sized> InstructionRunner for Box<T> {
    fn run_instruction(&self, instruction: &str) -> Result<InstructionOutput, HookError> {
        (**self).run_instruction(instruction)
    }
}

/// Runs instructions through the platform shell
#[derive(Debug, Clone)]
pub struct ShellRunner {
    program: String,
    flag: String,
}

impl ShellRunner {
    pub fn new() -> Self {
        if cfg!(windows) {
            Self::with_shell("cmd", "/C")
        } else {
            Self::with_shell("sh", "-c")
        }
    }

    /// Use a specific shell, e.g. `("bash", "-c")`
    pub fn with_shell(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionRunner for ShellRunner {
    fn run_instruction(&self, instruction: &str) -> Result<InstructionOutput, HookError> {
        tracing::debug!(shell = %self.program, "running instruction");

        let output = Command::new(&self.program)
            .arg(&self.flag)
            .arg(instruction)
            .output()
            .map_err(|source| HookError::Spawn {
                instruction: instruction.to_string(),
                source,
            })?;

        let result = InstructionOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
        };

        if !result.success {
            tracing::debug!(status = %output.status, stderr = %result.stderr, "instruction failed");
        }

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_trimmed_stdout() {
        let out = ShellRunner::new().run_instruction("echo '  0  '").unwrap();
        assert!(out.success);
        assert_eq!(out.stdout, "0");
    }

    #[test]
    fn test_non_zero_exit_is_not_an_error() {
        let out = ShellRunner::new()
            .run_instruction("echo oops >&2; exit 3")
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.stderr, "oops");
        assert_eq!(out.exit_code, Some(3));
    }

    #[test]
    fn test_missing_shell_is_spawn_error() {
        let runner = ShellRunner::with_shell("/definitely/not/a/shell", "-c");
        let err = runner.run_instruction("true").unwrap_err();
        assert!(matches!(err, HookError::Spawn { .. }));
    }
}
