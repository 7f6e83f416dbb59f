//! Bridge to the external execution engine.
//!
//! A run is a one-shot request/response over pipes: the workflow is written
//! to the child's stdin as one JSON line, stdin is closed, and stdout/stderr
//! are buffered until the process exits. Writing and draining run
//! concurrently. There is no timeout.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineSettings;
use crate::error::ExecuteError;
use crate::parse::types::Workflow;
use crate::validate;

/// Outcome of one engine run. `ok` is true exactly when `exit_code == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub ok: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    fn from_exit(exit_code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
        ExecutionResult {
            ok: exit_code == 0,
            exit_code,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    fn engine_missing(artifact: &std::path::Path) -> Self {
        ExecutionResult {
            ok: false,
            exit_code: -1,
            stdout: String::new(),
            stderr: format!("execution engine not found at {}", artifact.display()),
        }
    }
}

/// The request line written to the engine: compact JSON plus `\n`.
pub fn encode_request(workflow: &Workflow) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(workflow)?;
    line.push('\n');
    Ok(line)
}

#[derive(Debug, Clone)]
pub struct Executor {
    program: String,
    args: Vec<String>,
    artifact: PathBuf,
}

impl Executor {
    pub fn new(settings: &EngineSettings) -> Self {
        Executor {
            program: settings.program.clone(),
            args: settings.args.clone(),
            artifact: settings.artifact.clone(),
        }
    }

    /// Validate, then run. Execution is refused, and nothing is spawned,
    /// unless validation returns no diagnostics.
    pub fn execute(&self, workflow: &Workflow) -> Result<ExecutionResult, ExecuteError> {
        let diagnostics = validate::validate_workflow(workflow);
        if !diagnostics.is_empty() {
            warn!(
                workflow_id = %workflow.id,
                diagnostics = diagnostics.len(),
                "refusing to execute invalid workflow"
            );
            return Err(ExecuteError::Rejected(diagnostics));
        }
        self.run(workflow)
    }

    /// Send a workflow to the engine without validating it first.
    ///
    /// A missing engine artifact short-circuits with `ok = false` and
    /// `exit_code = -1`. A child killed by a signal also reports `-1`.
    pub fn run(&self, workflow: &Workflow) -> Result<ExecutionResult, ExecuteError> {
        if !self.artifact.exists() {
            warn!(artifact = %self.artifact.display(), "execution engine not found");
            return Ok(ExecutionResult::engine_missing(&self.artifact));
        }

        let request = encode_request(workflow)?;

        info!(
            workflow_id = %workflow.id,
            program = %self.program,
            "starting execution engine"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.artifact)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is fed from its own thread while this one drains stdout and
        // stderr; writing first would block once the engine fills its pipes.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                // The engine may exit before reading its input; its exit
                // status and output are still the result.
                if let Err(e) = stdin.write_all(request.as_bytes()) {
                    warn!(error = %e, "engine closed stdin early");
                }
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                warn!("engine stdin writer panicked");
            }
        }
        let exit_code = output.status.code().unwrap_or(-1);

        info!(workflow_id = %workflow.id, exit_code, "execution engine finished");

        Ok(ExecutionResult::from_exit(
            exit_code,
            &output.stdout,
            &output.stderr,
        ))
    }
}
