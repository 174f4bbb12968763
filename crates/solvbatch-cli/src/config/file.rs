use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInputsConfig {
    pub adjacency: Option<PathBuf>,
    pub solvent_table: Option<PathBuf>,
    pub pair_list: Option<PathBuf>,
    pub identifier_prefix: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub report: Option<PathBuf>,
    pub on_missing_result: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEstimatorConfig {
    pub program: Option<String>,
    pub classpath: Option<String>,
    pub main_class: Option<String>,
    pub extra_args: Option<Vec<String>>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub required_dirs: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStagingConfig {
    pub root: Option<PathBuf>,
    pub keep: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub inputs: Option<FileInputsConfig>,
    pub output: Option<FileOutputConfig>,
    pub estimator: Option<FileEstimatorConfig>,
    pub staging: Option<FileStagingConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `config.toml` in the platform configuration directory, when one exists.
    pub fn discover() -> Option<PathBuf> {
        ProjectDirs::from("edu", "caltech", "solvbatch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_all_sections() {
        let config = FileConfig::from_toml(
            r#"
            [inputs]
            adjacency = "lists/adj.txt"
            solvent-table = "db.csv"
            pair-list = "pairs.csv"
            identifier-prefix = "SMILES="

            [output]
            report = "out.csv"
            on-missing-result = "abort"

            [estimator]
            program = "/usr/bin/java"
            classpath = "/opt/RMG/classes"
            main-class = "Abraham"
            extra-args = ["-v"]
            required-dirs = ["GATPFit", "tmp"]
            timeout-secs = 120

            [staging]
            root = "/scratch"
            keep = true
            "#,
        )
        .unwrap();

        let inputs = config.inputs.unwrap();
        assert_eq!(inputs.solvent_table, Some(PathBuf::from("db.csv")));
        assert_eq!(inputs.identifier_prefix.as_deref(), Some("SMILES="));
        let estimator = config.estimator.unwrap();
        assert_eq!(estimator.main_class.as_deref(), Some("Abraham"));
        assert_eq!(estimator.timeout_secs, Some(120));
        assert_eq!(
            estimator.required_dirs,
            Some(vec!["GATPFit".to_string(), "tmp".to_string()])
        );
        assert_eq!(config.staging.unwrap().keep, Some(true));
        assert_eq!(
            config.output.unwrap().on_missing_result.as_deref(),
            Some("abort")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[estimator]\njava = \"java\"\n").is_err());
        assert!(FileConfig::from_toml("[forcefield]\ns-factor = 1.0\n").is_err());
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[inputs\n").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: ref p, .. } if p == &path));
    }
}
