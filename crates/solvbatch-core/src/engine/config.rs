use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::core::io::adjacency::DEFAULT_IDENTIFIER_PREFIX;

pub const DEFAULT_INPUT_FILE: &str = "Abraham_input.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "Abraham_output.txt";
pub const DEFAULT_REQUIRED_DIRS: [&str; 1] = ["GATPFit"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// What to do with a request whose batch succeeded but whose value never appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingResultPolicy {
    /// Record a consistency fault and keep every resolved row.
    #[default]
    Report,
    /// Abort the assembly with an error.
    Abort,
}

impl FromStr for MissingResultPolicy {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report" => Ok(Self::Report),
            "abort" => Ok(Self::Abort),
            other => Err(ConfigError::InvalidParameter {
                name: "missing_result_policy",
                reason: format!("expected 'report' or 'abort', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for MissingResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Report => "report",
            Self::Abort => "abort",
        })
    }
}

/// How to launch the external estimator and which files it exchanges.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub program: String,
    pub classpath: Option<String>,
    pub main_class: String,
    pub extra_args: Vec<String>,
    pub input_file: String,
    pub output_file: String,
    pub required_dirs: Vec<String>,
    pub timeout: Option<Duration>,
}

impl EstimatorConfig {
    /// Arguments passed after the program name.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.extra_args.len());
        if let Some(cp) = &self.classpath {
            args.push("-classpath".to_string());
            args.push(cp.clone());
        }
        args.push(self.main_class.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagingConfig {
    pub root: Option<PathBuf>, // Parent of the per-run directory; system temp dir when unset
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub identifier_prefix: String,
    pub missing_result_policy: MissingResultPolicy,
    pub staging: StagingConfig,
    pub estimator: EstimatorConfig,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    program: Option<String>,
    classpath: Option<String>,
    main_class: Option<String>,
    extra_args: Vec<String>,
    input_file: Option<String>,
    output_file: Option<String>,
    required_dirs: Option<Vec<String>>,
    timeout: Option<Duration>,
    identifier_prefix: Option<String>,
    missing_result_policy: Option<MissingResultPolicy>,
    staging_root: Option<PathBuf>,
    keep_staging: bool,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
    pub fn classpath(mut self, classpath: Option<String>) -> Self {
        self.classpath = classpath;
        self
    }
    pub fn main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = Some(main_class.into());
        self
    }
    pub fn extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
    pub fn input_file(mut self, name: impl Into<String>) -> Self {
        self.input_file = Some(name.into());
        self
    }
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }
    pub fn required_dirs(mut self, dirs: Vec<String>) -> Self {
        self.required_dirs = Some(dirs);
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = Some(prefix.into());
        self
    }
    pub fn missing_result_policy(mut self, policy: MissingResultPolicy) -> Self {
        self.missing_result_policy = Some(policy);
        self
    }
    pub fn staging_root(mut self, root: Option<PathBuf>) -> Self {
        self.staging_root = root;
        self
    }
    pub fn keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let program = self.program.ok_or(ConfigError::MissingParameter("program"))?;
        let main_class = self
            .main_class
            .ok_or(ConfigError::MissingParameter("main_class"))?;
        let input_file = self
            .input_file
            .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string());
        let output_file = self
            .output_file
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string());
        let identifier_prefix = self
            .identifier_prefix
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_PREFIX.to_string());

        for (name, value) in [
            ("program", &program),
            ("main_class", &main_class),
            ("input_file", &input_file),
            ("output_file", &output_file),
            ("identifier_prefix", &identifier_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if input_file == output_file {
            return Err(ConfigError::InvalidParameter {
                name: "output_file",
                reason: "must differ from the input file name".to_string(),
            });
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidParameter {
                name: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        let estimator = EstimatorConfig {
            program,
            classpath: self.classpath.filter(|cp| !cp.trim().is_empty()),
            main_class,
            extra_args: self.extra_args,
            input_file,
            output_file,
            required_dirs: self.required_dirs.unwrap_or_else(|| {
                DEFAULT_REQUIRED_DIRS.iter().map(|d| d.to_string()).collect()
            }),
            timeout: self.timeout,
        };

        Ok(PipelineConfig {
            identifier_prefix,
            missing_result_policy: self.missing_result_policy.unwrap_or_default(),
            staging: StagingConfig {
                root: self.staging_root,
                keep: self.keep_staging,
            },
            estimator,
        })
    }
}
