//! Viewer configuration from docview.toml

use crate::content::RenderOptions;
use crate::diagram::DEFAULT_MERMAID_SCRIPT_URL;
use crate::segmenter::{SegmentOptions, DEFAULT_TITLE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "docview.toml";

/// Viewer configuration; every key is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Title used when the document has no level-1 heading
    pub fallback_title: String,

    /// Fence info token treated as a diagram
    pub diagram_language: String,

    /// Keep heading-like lines inside fences in the section body
    pub fence_aware_headings: bool,

    /// Base directory of the documentation store
    pub docs_dir: PathBuf,

    /// Script URL for the client-side diagram engine
    pub mermaid_script_url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fallback_title: DEFAULT_TITLE.to_string(),
            diagram_language: RenderOptions::default().diagram_language,
            fence_aware_headings: false,
            docs_dir: PathBuf::from("./docs"),
            mermaid_script_url: DEFAULT_MERMAID_SCRIPT_URL.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ViewerConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ViewerConfig = toml::from_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Resolve the configuration to use
    ///
    /// An explicit path must exist. Without one, `docview.toml` in `dir` is
    /// used when present, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// Segmentation options derived from this configuration
    pub fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            fallback_title: self.fallback_title.clone(),
            fence_aware: self.fence_aware_headings,
        }
    }

    /// Renderer options derived from this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            diagram_language: self.diagram_language.clone(),
        }
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}", path = .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
}
