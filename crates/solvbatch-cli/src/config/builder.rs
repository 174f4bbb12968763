use super::defaults::{self, DefaultsConfig};
use super::file::{FileConfig, FileInputsConfig};
use super::models::{AppConfig, PlanConfig};
use crate::cli::{InputArgs, RunArgs};
use crate::error::{CliError, Result};
use solvbatch::core::io::adjacency::DEFAULT_IDENTIFIER_PREFIX;
use solvbatch::engine::config::{self as core_config, MissingResultPolicy};
use solvbatch::workflows::solvate::InputPaths;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(&args.inputs)?;

    let (inputs, identifier_prefix) = resolve_inputs(
        &args.inputs,
        file_config.inputs.take().unwrap_or_default(),
        &defaults,
    );

    let output_file = file_config.output.take().unwrap_or_default();
    let report_path = args
        .output
        .clone()
        .or(output_file.report)
        .unwrap_or(defaults.report);
    let missing_result_policy = match (args.on_missing_result, output_file.on_missing_result) {
        (Some(policy), _) => policy,
        (None, Some(text)) => text
            .parse::<MissingResultPolicy>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        (None, None) => MissingResultPolicy::default(),
    };

    let estimator_file = file_config.estimator.take().unwrap_or_default();
    let program = args
        .program
        .clone()
        .or(estimator_file.program)
        .unwrap_or(defaults.program);
    let classpath = args
        .classpath
        .clone()
        .or(estimator_file.classpath)
        .unwrap_or_else(|| defaults::default_classpath(std::env::var_os("RMG")));
    let main_class = args
        .main_class
        .clone()
        .or(estimator_file.main_class)
        .unwrap_or(defaults.main_class);
    let timeout = args
        .timeout
        .or(estimator_file.timeout_secs)
        .map(Duration::from_secs);

    let staging_file = file_config.staging.take().unwrap_or_default();
    let staging_root = args.staging_dir.clone().or(staging_file.root);
    let keep_staging = args.keep_staging || staging_file.keep.unwrap_or(false);

    let mut builder = core_config::PipelineConfigBuilder::new()
        .program(program)
        .classpath(Some(classpath))
        .main_class(main_class)
        .extra_args(estimator_file.extra_args.unwrap_or_default())
        .timeout(timeout)
        .identifier_prefix(identifier_prefix)
        .missing_result_policy(missing_result_policy)
        .staging_root(staging_root)
        .keep_staging(keep_staging);
    if let Some(name) = estimator_file.input_file {
        builder = builder.input_file(name);
    }
    if let Some(name) = estimator_file.output_file {
        builder = builder.output_file(name);
    }
    if let Some(dirs) = estimator_file.required_dirs {
        builder = builder.required_dirs(dirs);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        inputs,
        report_path,
        core_config,
    })
}

pub fn build_plan_config(args: &InputArgs) -> Result<PlanConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args)?;
    let (inputs, identifier_prefix) = resolve_inputs(
        args,
        file_config.inputs.take().unwrap_or_default(),
        &defaults,
    );
    if identifier_prefix.trim().is_empty() {
        return Err(CliError::Config(
            "identifier prefix must not be empty".to_string(),
        ));
    }
    Ok(PlanConfig {
        inputs,
        identifier_prefix,
    })
}

fn load_file_config(args: &InputArgs) -> Result<FileConfig> {
    let path = args.config.clone().or_else(FileConfig::discover);
    let config = match path {
        Some(path) => FileConfig::from_file(&path)?,
        None => {
            debug!("No configuration file given or found; using built-in defaults.");
            FileConfig::default()
        }
    };
    apply_set_values(config, &args.set_values)
}

fn resolve_inputs(
    args: &InputArgs,
    file: FileInputsConfig,
    defaults: &DefaultsConfig,
) -> (InputPaths, String) {
    let inputs = InputPaths {
        adjacency: args
            .adjacency
            .clone()
            .or(file.adjacency)
            .unwrap_or_else(|| defaults.adjacency.clone()),
        solvent_table: args
            .solvents
            .clone()
            .or(file.solvent_table)
            .unwrap_or_else(|| defaults.solvent_table.clone()),
        pair_list: args
            .pairs
            .clone()
            .or(file.pair_list)
            .unwrap_or_else(|| defaults.pair_list.clone()),
    };
    let identifier_prefix = args
        .identifier_prefix
        .clone()
        .or(file.identifier_prefix)
        .unwrap_or_else(|| DEFAULT_IDENTIFIER_PREFIX.to_string());
    (inputs, identifier_prefix)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "inputs.adjacency" => {
                config.inputs.get_or_insert_with(Default::default).adjacency =
                    Some(PathBuf::from(value_str))
            }
            "inputs.solvent-table" => {
                config.inputs.get_or_insert_with(Default::default).solvent_table =
                    Some(PathBuf::from(value_str))
            }
            "inputs.pair-list" => {
                config.inputs.get_or_insert_with(Default::default).pair_list =
                    Some(PathBuf::from(value_str))
            }
            "inputs.identifier-prefix" => {
                config
                    .inputs
                    .get_or_insert_with(Default::default)
                    .identifier_prefix = Some(value_str.to_string())
            }
            "output.report" => {
                config.output.get_or_insert_with(Default::default).report =
                    Some(PathBuf::from(value_str))
            }
            "output.on-missing-result" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .on_missing_result = Some(value_str.to_string())
            }
            "estimator.program" => {
                config.estimator.get_or_insert_with(Default::default).program =
                    Some(value_str.to_string())
            }
            "estimator.classpath" => {
                config.estimator.get_or_insert_with(Default::default).classpath =
                    Some(value_str.to_string())
            }
            "estimator.main-class" => {
                config.estimator.get_or_insert_with(Default::default).main_class =
                    Some(value_str.to_string())
            }
            "estimator.extra-args" => {
                config.estimator.get_or_insert_with(Default::default).extra_args =
                    Some(value_str.split_whitespace().map(str::to_string).collect())
            }
            "estimator.input-file" => {
                config.estimator.get_or_insert_with(Default::default).input_file =
                    Some(value_str.to_string())
            }
            "estimator.output-file" => {
                config.estimator.get_or_insert_with(Default::default).output_file =
                    Some(value_str.to_string())
            }
            "estimator.required-dirs" => {
                config.estimator.get_or_insert_with(Default::default).required_dirs = Some(
                    value_str
                        .split(',')
                        .map(str::trim)
                        .filter(|dir| !dir.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            "estimator.timeout-secs" => {
                config.estimator.get_or_insert_with(Default::default).timeout_secs =
                    Some(parse_value(key, value_str, "integer")?)
            }
            "staging.root" => {
                config.staging.get_or_insert_with(Default::default).root =
                    Some(PathBuf::from(value_str))
            }
            "staging.keep" => {
                config.staging.get_or_insert_with(Default::default).keep =
                    Some(parse_value(key, value_str, "boolean")?)
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
