//! Sandbox executor: compile (when the language calls for it) and run
//! assembled programs in private temp workspaces under a wall-clock
//! timeout.
//!
//! Isolation here is deliberately minimal: a fresh workspace per
//! submission plus a hard timeout. The workspace is an owned handle
//! whose drop deletes every artifact — source, binary, class files —
//! on success, error, timeout and cancellation alike.

use crate::error::JudgeError;
use gavel_common::config::{LanguageConfigManager, ToolchainCommand, DEFAULT_TIMEOUT_MS};
use gavel_common::types::{ExecutionOutput, ExecutionRequest, Language};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Safety limits so pathological submissions never reach a toolchain.
const MAX_SOURCE_CODE_BYTES: usize = 1024 * 1024;
const MAX_STDIN_BYTES: usize = 10 * 1024 * 1024;

/// Private temp workspace for one submission. Dropping it removes the
/// directory and everything the toolchain wrote into it.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn create() -> std::io::Result<Workspace> {
        let dir = tempfile::Builder::new().prefix("gavel-").tempdir()?;
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A compiled (or compile-validated) program, ready to run against
/// many test inputs. Owns its workspace: the artifact and its files
/// live exactly as long as this handle.
#[derive(Debug)]
pub struct Artifact {
    workspace: Workspace,
    language: Language,
    run: ToolchainCommand,
}

impl Artifact {
    pub fn language(&self) -> Language {
        self.language
    }
}

/// Outcome of the compile step. A failed compile is a judgement, not
/// an error: the caller turns it into a CompilationError verdict.
#[derive(Debug)]
pub enum Prepared {
    Ready(Artifact),
    CompileFailed { diagnostic: String },
}

/// Compiles and runs programs per the configured language toolchains.
#[derive(Debug, Clone)]
pub struct Sandbox {
    config: LanguageConfigManager,
}

impl Sandbox {
    pub fn new(config: LanguageConfigManager) -> Sandbox {
        Sandbox { config }
    }

    pub fn config(&self) -> &LanguageConfigManager {
        &self.config
    }

    /// Write the source into a fresh workspace and compile it once.
    ///
    /// Ahead-of-time and VM languages get a real compile; the
    /// interpreted toolchain is configured with a syntax-check step so
    /// broken submissions also surface as compilation failures before
    /// any test case runs.
    pub async fn prepare(&self, language: Language, source: &str) -> Result<Prepared, JudgeError> {
        if source.len() > MAX_SOURCE_CODE_BYTES {
            return Err(JudgeError::SourceTooLarge {
                limit: MAX_SOURCE_CODE_BYTES,
            });
        }

        let config = self.config.get_config(language)?;
        let workspace = Workspace::create()?;

        // Java requires the file name to match the public class.
        let file_name = match language {
            Language::Java => "Main.java".to_string(),
            _ => format!("{}.{}", Uuid::new_v4(), config.file_extension),
        };
        let source_path = workspace.path().join(&file_name);
        tokio::fs::write(&source_path, source).await?;

        let binary_path = workspace.path().join("main.bin");

        if let Some(compile) = &config.compile {
            let command = substitute(compile, &source_path, &binary_path, workspace.path());
            debug!(language = %language, command = %command.command, "compiling");
            let output = Command::new(&command.command)
                .args(&command.args)
                .current_dir(workspace.path())
                .stdin(Stdio::null())
                .output()
                .await?;
            if !output.status.success() {
                let mut diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
                if diagnostic.trim().is_empty() {
                    diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
                }
                warn!(language = %language, "compilation failed");
                return Ok(Prepared::CompileFailed { diagnostic });
            }
        }

        let run = substitute(&config.run, &source_path, &binary_path, workspace.path());
        Ok(Prepared::Ready(Artifact {
            workspace,
            language,
            run,
        }))
    }

    /// Run a prepared artifact once with `stdin` piped in, bounded by
    /// `timeout_ms` of wall-clock time. On expiry or cancellation the
    /// subprocess is killed; workspace cleanup is untouched either way.
    pub async fn run(
        &self,
        artifact: &Artifact,
        stdin: &str,
        timeout_ms: u64,
        cancel: &CancellationToken,
    ) -> ExecutionOutput {
        if stdin.len() > MAX_STDIN_BYTES {
            return ExecutionOutput::infrastructure_failure(format!(
                "test input exceeds {} bytes",
                MAX_STDIN_BYTES
            ));
        }

        let start = Instant::now();
        let mut command = Command::new(&artifact.run.command);
        command
            .args(&artifact.run.args)
            .current_dir(artifact.workspace.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionOutput::infrastructure_failure(format!(
                    "failed to spawn '{}': {}",
                    artifact.run.command, e
                ));
            }
        };

        let mut stdin_handle = child.stdin.take();
        let output_fut = async {
            if let Some(mut handle) = stdin_handle.take() {
                // A fast-exiting program may close its end first; a
                // broken pipe here is not a judging failure.
                let _ = handle.write_all(stdin.as_bytes()).await;
                drop(handle);
            }
            child.wait_with_output().await
        };

        let timeout = Duration::from_millis(timeout_ms);
        let waited = tokio::select! {
            waited = tokio::time::timeout(timeout, output_fut) => waited,
            _ = cancel.cancelled() => {
                // Dropping the wait future kills the child via kill_on_drop.
                warn!(language = %artifact.language, "execution cancelled");
                return ExecutionOutput {
                    stdout: String::new(),
                    stderr: String::new(),
                    error: Some("execution cancelled".to_string()),
                    wall_clock_ms: start.elapsed().as_millis() as u64,
                    timed_out: false,
                    runtime_error: true,
                    compilation_failed: false,
                };
            }
        };

        let wall_clock_ms = start.elapsed().as_millis() as u64;

        match waited {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let (runtime_error, error) = match output.status.code() {
                    Some(0) => (false, None),
                    Some(code) => (true, Some(format!("process exited with code {}", code))),
                    None => (true, Some("process terminated by signal".to_string())),
                };
                if runtime_error {
                    warn!(language = %artifact.language, wall_clock_ms, "runtime error");
                } else {
                    debug!(language = %artifact.language, wall_clock_ms, "execution completed");
                }
                ExecutionOutput {
                    stdout,
                    stderr,
                    error,
                    wall_clock_ms,
                    timed_out: false,
                    runtime_error,
                    compilation_failed: false,
                }
            }
            Ok(Err(e)) => ExecutionOutput {
                wall_clock_ms,
                ..ExecutionOutput::infrastructure_failure(format!("execution failed: {}", e))
            },
            Err(_) => {
                // Timeout: the dropped wait future killed the child.
                warn!(language = %artifact.language, timeout_ms, "execution timed out");
                ExecutionOutput {
                    stdout: String::new(),
                    stderr: "[execution timed out]".to_string(),
                    error: Some(format!("time limit of {} ms exceeded", timeout_ms)),
                    wall_clock_ms,
                    timed_out: true,
                    runtime_error: false,
                    compilation_failed: false,
                }
            }
        }
    }

    /// One-shot compile-and-run for the standalone execution
    /// interface: `{language, code, stdin}` → `{stdout, stderr, error}`.
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutput, JudgeError> {
        let timeout_ms = self
            .config
            .get_config(request.language)
            .map(|c| c.default_timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        match self.prepare(request.language, &request.source_code).await? {
            Prepared::CompileFailed { diagnostic } => Ok(ExecutionOutput {
                stdout: String::new(),
                stderr: diagnostic,
                error: Some("compilation failed".to_string()),
                wall_clock_ms: 0,
                timed_out: false,
                runtime_error: false,
                compilation_failed: true,
            }),
            Prepared::Ready(artifact) => Ok(self
                .run(&artifact, &request.stdin, timeout_ms, &CancellationToken::new())
                .await),
        }
    }
}

fn substitute(
    command: &ToolchainCommand,
    source: &Path,
    binary: &Path,
    dir: &Path,
) -> ToolchainCommand {
    let fill = |text: &str| {
        text.replace("{source}", &source.to_string_lossy())
            .replace("{binary}", &binary.to_string_lossy())
            .replace("{dir}", &dir.to_string_lossy())
    };
    ToolchainCommand {
        command: fill(&command.command),
        args: command.args.iter().map(|a| fill(a)).collect(),
    }
}
