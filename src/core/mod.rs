//! Core module - data model, loading and completeness checks

pub mod config;
pub mod grid;
pub mod loader;
pub mod results;
pub mod scenario;
pub mod variant;

pub use config::{Config, ConfigError, TableConfig};
pub use grid::{check_completeness, Completeness, ExpectedGrid, MissingEntry};
pub use loader::{
    load_results, Duplicate, DuplicatePolicy, LoadError, LoadReport, SkipReason, SkippedFile,
};
pub use results::{Metric, ResultRow, ResultTable};
pub use scenario::{Design, Model, Rho, ScenarioKey, ScenarioParseError, Selection};
pub use variant::{Layout, TableId, TableSpec};
