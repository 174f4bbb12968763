use solvbatch::engine::config::PipelineConfig;
use solvbatch::workflows::solvate::InputPaths;
use std::path::PathBuf;

#[derive(Debug)]
pub struct AppConfig {
    pub inputs: InputPaths,
    pub report_path: PathBuf,
    pub core_config: PipelineConfig,
}

#[derive(Debug)]
pub struct PlanConfig {
    pub inputs: InputPaths,
    pub identifier_prefix: String,
}
