use freight_sim::{Scenario, ScenarioError, ScenarioLoader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a scenario from disk.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario {}: {source}", .path.display())]
    Scenario {
        path: PathBuf,
        #[source]
        source: ScenarioError,
    },
    #[error("bundled scenario is invalid: {0}")]
    Bundled(#[source] ScenarioError),
}

/// Loads a scenario file, or the bundled sample when no path is given.
#[derive(Debug, Clone, Default)]
pub struct FileScenarioLoader {
    path: Option<PathBuf>,
}

impl FileScenarioLoader {
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ScenarioLoader for FileScenarioLoader {
    type Error = LoaderError;

    fn load_scenario(&self) -> Result<Scenario, Self::Error> {
        let Some(path) = &self.path else {
            log::debug!("no scenario path given, using bundled scenario");
            return Scenario::default_scenario().map_err(LoaderError::Bundled);
        };
        let raw = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("loaded scenario from {}", path.display());
        Scenario::from_json(&raw).map_err(|source| LoaderError::Scenario {
            path: path.clone(),
            source,
        })
    }
}
