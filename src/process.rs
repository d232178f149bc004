//! Shared subprocess execution for the external CLI wrappers.
//!
//! Every wrapped tool (`git`, the build-system CLI, `gh`) runs through
//! [`run`], which sets the working directory explicitly on the child process
//! instead of mutating the process-wide current directory. There is no
//! timeout layer: these are short-lived local developer commands, and a hung
//! external command is surfaced by the user interrupting it.

use std::path::Path;
use std::process::Command;

/// Failure of an external command: either it could not be spawned or it
/// exited non-zero. `command` is the rendered argument list, `stderr` the
/// captured diagnostics.
#[derive(Debug)]
pub struct ExecFailure {
    pub command: String,
    pub stderr: String,
}

/// Run `program` with `args`, blocking until it exits.
///
/// Returns captured stdout on success. When `directory` is `None` the child
/// inherits the process's current working directory.
pub fn run(
    program: &str,
    args: &[String],
    directory: Option<&Path>,
) -> std::result::Result<String, ExecFailure> {
    let rendered = args.join(" ");
    log::debug!(
        "running: {} {} (cwd: {})",
        program,
        rendered,
        directory.map(|d| d.display().to_string()).unwrap_or_default()
    );

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = directory {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| ExecFailure {
        command: rendered.clone(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ExecFailure {
            command: rendered,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let out = run("echo", &["hello".to_string()], None).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_run_missing_program_reports_spawn_error() {
        let err = run("definitely-not-a-real-binary", &[], None).unwrap_err();
        assert!(!err.stderr.is_empty());
    }

    #[test]
    fn test_run_respects_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = run("pwd", &[], Some(temp.path())).unwrap();
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        let expected = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(reported, expected);
    }

    #[test]
    fn test_run_nonzero_exit_reports_stderr() {
        let err = run(
            "sh",
            &["-c".to_string(), "echo boom >&2; exit 3".to_string()],
            None,
        )
        .unwrap_err();
        assert_eq!(err.stderr, "boom");
    }
}
