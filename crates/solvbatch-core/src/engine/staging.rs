use super::config::StagingConfig;
use super::error::EngineError;
use crate::core::models::ids::SolventName;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const RUN_DIR_PREFIX: &str = "solvbatch-run-";
const MAX_SLUG_LEN: usize = 40;

/// Working directories for one run.
///
/// Every run gets a freshly created, uniquely named directory and every batch a
/// numbered subdirectory inside it, so the estimator's fixed file names never
/// collide between batches or between concurrent runs. The run directory is
/// removed on drop unless it was configured to be kept.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    kept: bool,
    batches: usize,
}

impl StagingArea {
    pub fn create(config: &StagingConfig) -> Result<Self, EngineError> {
        let parent = config.root.clone().unwrap_or_else(std::env::temp_dir);
        let staging_err = |source| EngineError::Staging {
            path: parent.clone(),
            source,
        };
        fs::create_dir_all(&parent).map_err(staging_err)?;
        let dir = tempfile::Builder::new()
            .prefix(RUN_DIR_PREFIX)
            .keep(config.keep)
            .tempdir_in(&parent)
            .map_err(staging_err)?;

        if config.keep {
            info!("Staging files will be kept in {:?}", dir.path());
        } else {
            debug!("Created staging area {:?}", dir.path());
        }
        Ok(Self {
            dir,
            kept: config.keep,
            batches: 0,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn is_kept(&self) -> bool {
        self.kept
    }

    /// Creates the working directory for the next batch.
    pub fn batch_dir(&mut self, solvent: &SolventName) -> Result<PathBuf, EngineError> {
        self.batches += 1;
        let path = self
            .dir
            .path()
            .join(format!("batch-{:04}-{}", self.batches, slug(solvent.as_str())));
        fs::create_dir(&path).map_err(|source| EngineError::Staging {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .take(MAX_SLUG_LEN)
        .collect();
    if slug.is_empty() { "solvent".to_string() } else { slug }
}
