//! Configuration - input/output locations and formatting defaults
//!
//! Read from the file named by `--config` / `MCTAB_CONFIG`, otherwise from
//! `mctab.yaml` in the working directory when present. Sections left out
//! fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::loader::DuplicatePolicy;
use crate::core::variant::TableId;
use crate::latex::number::FormatOptions;
use crate::latex::table::TableWrap;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mctab.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Locations and wrapper for one table
///
/// `input_dir` and `output` are both required when a table is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Directory holding the per-scenario CSV files
    pub input_dir: PathBuf,
    /// Where the `.tex` file is written
    pub output: PathBuf,
    /// Optional `table` float around the `tabular`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<TableWrap>,
}

impl TableConfig {
    fn new(input_dir: &str, output: &str) -> Self {
        Self {
            input_dir: PathBuf::from(input_dir),
            output: PathBuf::from(output),
            wrap: None,
        }
    }
}

/// Per-table settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub table1: TableConfig,
    pub table2: TableConfig,
    pub table3: TableConfig,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            table1: TableConfig::new("output/partial", "output/tables/table1.tex"),
            table2: TableConfig::new("output/partial_tab2", "output/tables/table2.tex"),
            table3: TableConfig::new("output/partial_tab3", "output/tables/table3.tex"),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: FormatOptions,
    pub duplicates: DuplicatePolicy,
    pub tables: Tables,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, `mctab.yaml` in
    /// the working directory is used if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::from_file(path)?, Some(path.to_path_buf()))),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Ok((Self::from_file(&local)?, Some(local)))
                } else {
                    Ok((Self::default(), None))
                }
            }
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty file deserializes to null, which means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn table(&self, id: TableId) -> &TableConfig {
        match id {
            TableId::Table1 => &self.tables.table1,
            TableId::Table2 => &self.tables.table2,
            TableId::Table3 => &self.tables.table3,
        }
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
