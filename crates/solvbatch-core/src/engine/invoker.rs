use super::config::EstimatorConfig;
use crate::core::io::estimator::EstimatorInput;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDOUT_CAPTURE: &str = "estimator.stdout";
const STDERR_CAPTURE: &str = "estimator.stderr";

/// Everything one estimator invocation left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimatorOutput {
    pub stdout: String,
    pub diagnostics: String,
    pub exit_code: Option<i32>,
    pub output: Option<String>, // Contents of the output file, if the estimator wrote one
}

impl EstimatorOutput {
    /// Any byte on the diagnostic stream counts, whitespace included.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to prepare working directory '{}': {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("estimator did not finish within {:.1} s and was killed", timeout.as_secs_f64())]
    Timeout { timeout: Duration },
    #[error("failed while waiting for the estimator: {0}")]
    Wait(#[source] io::Error),
}

/// A single blocking call into the solvation estimator.
///
/// `workdir` is an empty directory owned by this invocation; implementations may
/// create any files they need inside it.
pub trait Estimator {
    fn invoke(&self, input: &EstimatorInput, workdir: &Path)
    -> Result<EstimatorOutput, InvocationError>;
}

/// Runs the estimator as an external program inside the batch directory.
#[derive(Debug, Clone)]
pub struct ProcessEstimator {
    config: EstimatorConfig,
}

impl ProcessEstimator {
    /// Relative classpath entries are resolved against the current directory,
    /// since the child runs with the batch directory as its working directory.
    pub fn new(mut config: EstimatorConfig) -> Self {
        if let Some(cp) = config.classpath.take() {
            config.classpath = Some(absolutize_classpath(&cp));
        }
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn prepare(&self, input: &EstimatorInput, workdir: &Path) -> Result<(), InvocationError> {
        let workspace_err = |path: PathBuf| {
            move |source: io::Error| InvocationError::Workspace { path, source }
        };
        for dir in &self.config.required_dirs {
            let path = workdir.join(dir);
            fs::create_dir_all(&path).map_err(workspace_err(path.clone()))?;
        }
        let input_path = workdir.join(&self.config.input_file);
        let mut file = File::create(&input_path).map_err(workspace_err(input_path.clone()))?;
        input
            .write_to(&mut file)
            .map_err(workspace_err(input_path.clone()))?;

        let output_path = workdir.join(&self.config.output_file);
        if output_path.exists() {
            fs::remove_file(&output_path).map_err(workspace_err(output_path.clone()))?;
        }
        Ok(())
    }

    fn spawn(&self, workdir: &Path) -> Result<Child, InvocationError> {
        let capture = |name: &str| {
            let path = workdir.join(name);
            File::create(&path).map_err(|source| InvocationError::Workspace { path, source })
        };
        let stdout = capture(STDOUT_CAPTURE)?;
        let stderr = capture(STDERR_CAPTURE)?;

        let args = self.config.arguments();
        debug!(program = %self.config.program, ?args, workdir = ?workdir, "Spawning estimator");
        Command::new(&self.config.program)
            .args(&args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| InvocationError::Spawn {
                program: self.config.program.clone(),
                source,
            })
    }
}

impl Estimator for ProcessEstimator {
    fn invoke(
        &self,
        input: &EstimatorInput,
        workdir: &Path,
    ) -> Result<EstimatorOutput, InvocationError> {
        self.prepare(input, workdir)?;
        let mut child = self.spawn(workdir)?;
        let status = wait_for_child(&mut child, self.config.timeout)?;

        let exit_code = status.code();
        if !status.success() {
            warn!(
                solvent = %input.solvent(),
                ?exit_code,
                "Estimator exited with a non-zero status"
            );
        }

        let output_path = workdir.join(&self.config.output_file);
        let output = if output_path.is_file() {
            Some(read_lossy(&output_path)?)
        } else {
            None
        };

        Ok(EstimatorOutput {
            stdout: read_lossy(&workdir.join(STDOUT_CAPTURE))?,
            diagnostics: read_lossy(&workdir.join(STDERR_CAPTURE))?,
            exit_code,
            output,
        })
    }
}

fn wait_for_child(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<ExitStatus, InvocationError> {
    let Some(timeout) = timeout else {
        return child.wait().map_err(InvocationError::Wait);
    };

    let started_at = Instant::now();
    loop {
        match child.try_wait().map_err(InvocationError::Wait)? {
            Some(status) => return Ok(status),
            None if started_at.elapsed() >= timeout => {
                let _ = child.kill();
                child.wait().map_err(InvocationError::Wait)?;
                return Err(InvocationError::Timeout { timeout });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    }
}

fn read_lossy(path: &Path) -> Result<String, InvocationError> {
    let bytes = fs::read(path).map_err(|source| InvocationError::Workspace {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn absolutize_classpath(classpath: &str) -> String {
    let entries: Vec<PathBuf> = std::env::split_paths(classpath)
        .map(|entry| {
            if entry.as_os_str().is_empty() || entry.is_absolute() {
                entry
            } else {
                std::path::absolute(&entry).unwrap_or(entry)
            }
        })
        .collect();
    match std::env::join_paths(&entries) {
        Ok(joined) => joined.to_string_lossy().into_owned(),
        Err(_) => classpath.to_string(),
    }
}
