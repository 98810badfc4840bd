//! Packaging tool invocation
//!
//! `PackTool` is the seam between the executor and the external program.
//! `PackwizTool` runs the real binary; tests substitute a scripted mock.

use crate::planner::WorkAction;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, trace};

/// Keep at most this many trailing stderr lines in a failure
const STDERR_TAIL_LINES: usize = 5;

/// Why a single invocation failed. Every variant counts as one failed attempt.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}{}", describe_code(.code), describe_stderr(.stderr))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (killed by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// An external program that can carry out `WorkAction`s in a directory
#[async_trait]
pub trait PackTool: Send + Sync {
    /// Program name, for messages
    fn name(&self) -> &str;

    /// Run `action` once with `dir` as the working directory
    ///
    /// The directory is always passed explicitly; implementations must not
    /// touch the process-wide current directory.
    async fn invoke(&self, dir: &Path, action: &WorkAction, timeout: Duration) -> Result<(), ToolError>;
}

/// The packwiz command line tool
#[derive(Debug, Clone)]
pub struct PackwizTool {
    program: String,
}

impl PackwizTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command line arguments for `action`
    pub fn args_for(action: &WorkAction) -> Vec<String> {
        match action {
            WorkAction::AddMod { url, platform, .. } => vec![
                platform.alias().to_string(),
                "add".to_string(),
                url.clone(),
                "--yes".to_string(),
            ],
            WorkAction::InstallResource { spec, platform, .. } => vec![
                "-y".to_string(),
                platform.as_str().to_string(),
                "install".to_string(),
                spec.clone(),
            ],
            WorkAction::Update => vec![
                "update".to_string(),
                "--all".to_string(),
                "--yes".to_string(),
            ],
            WorkAction::Export { format } => vec![format.as_str().to_string(), "export".to_string()],
        }
    }
}

impl Default for PackwizTool {
    fn default() -> Self {
        Self::new("packwiz")
    }
}

#[async_trait]
impl PackTool for PackwizTool {
    fn name(&self) -> &str {
        &self.program
    }

    async fn invoke(&self, dir: &Path, action: &WorkAction, timeout: Duration) -> Result<(), ToolError> {
        let args = Self::args_for(action);
        debug!("{} {} (in {})", self.program, args.join(" "), dir.display());

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ToolError::Spawn {
                    program: self.program.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(ToolError::Timeout {
                    program: self.program.clone(),
                    timeout,
                })
            }
        };

        trace!("stdout: {}", String::from_utf8_lossy(&output.stdout));

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            })
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
