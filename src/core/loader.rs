//! Result loader - reads per-scenario CSV files into a [`ResultTable`]
//!
//! One bad file never aborts a load: it is recorded in the [`LoadReport`]
//! with the reason it was skipped and the remaining files are processed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::grid::ExpectedGrid;
use crate::core::results::{Metric, ResultRow, ResultTable};
use crate::core::scenario::{ScenarioKey, ScenarioParseError};

/// File extension the loader picks up
pub const RESULT_EXTENSION: &str = "csv";

/// What to do when two files decode to the same scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later file in sorted listing order replaces the earlier one
    #[default]
    LastWins,
    /// Any collision aborts the load
    Error,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
            DuplicatePolicy::Error => write!(f, "error"),
        }
    }
}

/// Fatal loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "Duplicate results for {key}: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateKey {
        key: ScenarioKey,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Why a file was left out of the result table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed filename: {0}")]
    Filename(#[from] ScenarioParseError),

    #[error("{0} is outside the expected grid")]
    OutsideGrid(ScenarioKey),

    #[error("unreadable content: {0}")]
    Unreadable(String),
}

/// A file the loader could not use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A scenario that more than one file decoded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub key: ScenarioKey,
    /// File whose row was discarded
    pub replaced: PathBuf,
    /// File whose row was kept
    pub kept: PathBuf,
}

/// Everything a load produced
#[derive(Debug, Default)]
pub struct LoadReport {
    pub results: ResultTable,
    /// Result files seen, usable or not
    pub files_found: usize,
    /// Files that made it into the table, in processing order
    pub loaded: Vec<(PathBuf, ScenarioKey)>,
    pub skipped: Vec<SkippedFile>,
    pub duplicates: Vec<Duplicate>,
}

impl LoadReport {
    /// Number of grid keys whose rows carry data
    pub fn available(&self, grid: &ExpectedGrid) -> usize {
        grid.keys()
            .filter(|key| self.results.get(key).is_some_and(ResultRow::is_available))
            .count()
    }
}

/// List result files in `dir`, sorted by file name
///
/// Not recursive. A missing directory yields no files.
pub fn list_result_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(RESULT_EXTENSION))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

/// Read the first data row of a result file
///
/// A file with a header but no data rows yields an empty row.
pub fn read_result_row(path: &Path) -> Result<ResultRow, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut row = ResultRow::default();

    let record = match reader.records().next() {
        Some(record) => record?,
        None => return Ok(row),
    };

    for metric in Metric::ALL {
        let value = headers
            .iter()
            .position(|h| h == metric.column())
            .and_then(|i| record.get(i))
            .and_then(|cell| cell.parse::<f64>().ok());
        row.set(metric, value);
    }

    Ok(row)
}

/// Load every result file in `dir` that maps onto `grid`
pub fn load_results(
    dir: &Path,
    grid: &ExpectedGrid,
    policy: DuplicatePolicy,
) -> Result<LoadReport, LoadError> {
    let files = list_result_files(dir);
    let mut report = LoadReport {
        files_found: files.len(),
        ..Default::default()
    };

    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let key = match ScenarioKey::from_filename(&filename) {
            Ok(decoded) => match grid.resolve(decoded) {
                Some(key) => key,
                None => {
                    report.skipped.push(SkippedFile {
                        path,
                        reason: SkipReason::OutsideGrid(decoded),
                    });
                    continue;
                }
            },
            Err(e) => {
                report.skipped.push(SkippedFile {
                    path,
                    reason: e.into(),
                });
                continue;
            }
        };

        let row = match read_result_row(&path) {
            Ok(row) => row,
            Err(e) => {
                report.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        let previous = report
            .loaded
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(p, _)| p.clone());
        if let Some(previous) = previous {
            match policy {
                DuplicatePolicy::Error => {
                    return Err(LoadError::DuplicateKey {
                        key,
                        first: previous,
                        second: path,
                    });
                }
                DuplicatePolicy::LastWins => {
                    report.duplicates.push(Duplicate {
                        key,
                        replaced: previous,
                        kept: path.clone(),
                    });
                    report.loaded.retain(|(_, k)| *k != key);
                }
            }
        }

        report.results.insert(key, row);
        report.loaded.push((path, key));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::{Design, Model, Rho, Selection};
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "AB_bias,AB_se,SYS_bias,SYS_se,AB_valid,SYS_valid";

    fn rho(h: u8) -> Rho {
        Rho::from_hundredths(h).unwrap()
    }

    fn grid() -> ExpectedGrid {
        ExpectedGrid {
            designs: vec![
                Design::Selection(Selection::Exogenous),
                Design::Selection(Selection::Endogenous),
            ],
            models: vec![Model::A, Model::B],
            sample_sizes: vec![500, 5000],
            rhos: vec![rho(25), rho(50), rho(75)],
        }
    }

    fn experiment_grid() -> ExpectedGrid {
        ExpectedGrid {
            designs: (1..=5).map(Design::Experiment).collect(),
            models: vec![Model::A, Model::B],
            sample_sizes: vec![5000],
            rhos: vec![rho(25), rho(50), rho(75)],
        }
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn endo_a_500_25() -> ScenarioKey {
        ScenarioKey::new(Design::Selection(Selection::Endogenous), Model::A, 500, rho(25))
    }

    #[test]
    fn test_reads_all_six_metrics() {
        let tmp = tempdir().unwrap();
        write(
            tmp.path(),
            "endo_modelA_N500_rho0.25.csv",
            &format!("{}\n-0.00351,0.31394,0.0021,0.05,998,1000\n", HEADER),
        );

        let report = load_results(tmp.path(), &grid(), DuplicatePolicy::LastWins).unwrap();
        let row = report.results.get(&endo_a_500_25()).unwrap();
        assert_eq!(row.ab_bias, Some(-0.00351));
        assert_eq!(row.ab_se, Some(0.31394));
        assert_eq!(row.sys_bias, Some(0.0021));
        assert_eq!(row.sys_se, Some(0.05));
        assert_eq!(row.ab_valid, Some(998.0));
        assert_eq!(row.sys_valid, Some(1000.0));
        assert_eq!(report.files_found, 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_missing_columns_and_bad_cells_are_absent() {
        let tmp = tempdir().unwrap();
        write(
            tmp.path(),
            "endo_modelA_N500_rho0.25.csv",
            "AB_bias,SYS_bias,SYS_se\nNaN,oops,\n",
        );

        let report = load_results(tmp.path(), &grid(), DuplicatePolicy::LastWins).unwrap();
        let row = report.results.get(&endo_a_500_25()).unwrap();
        assert_eq!(*row, ResultRow::default());
    }

    #[test]
    fn test_zero_rows_is_present_but_empty() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "endo_modelA_N500_rho0.25.csv", &format!("{}\n", HEADER));

        let report = load_results(tmp.path(), &grid(), DuplicatePolicy::LastWins).unwrap();
        assert!(report.results.contains(&endo_a_500_25()));
        assert!(!report.results.get(&endo_a_500_25()).unwrap().is_available());
        assert_eq!(report.available(&grid()), 0);
    }

    #[test]
    fn test_malformed_filenames_are_skipped() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "endo_modelA_N500.csv", HEADER);
        write(tmp.path(), "endo_modelA_Nbig_rho0.25.csv", HEADER);
        write(tmp.path(), "summary.csv", HEADER);
        write(tmp.path(), "notes.txt", "ignored, wrong extension");
        write(
            tmp.path(),
            "nonendo_modelB_N5000_rho0.75.csv",
            &format!("{}\n0.1,0.2,0.3,0.4,1,1\n", HEADER),
        );

        let report = load_results(tmp.path(), &grid(), DuplicatePolicy::LastWins).unwrap();
        assert_eq!(report.files_found, 4);
        assert_eq!(report.skipped.len(), 3);
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::Filename(_))));
        assert_eq!(report.results.len(), 1);
    }

    #[test]
    fn test_keys_outside_grid_are_skipped() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "exp2_modelA_N500_rho0.25.csv", HEADER);
        write(tmp.path(), "exp2_modelA_N5000_rho0.25.csv", HEADER);

        let report =
            load_results(tmp.path(), &experiment_grid(), DuplicatePolicy::LastWins).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::OutsideGrid(_)));
        for (key, _) in report.results.iter() {
            assert!(experiment_grid().contains(key));
        }
    }

    #[test]
    fn test_endo_files_feed_experiment_one() {
        let tmp = tempdir().unwrap();
        write(
            tmp.path(),
            "endo_modelA_N5000_rho0.5.csv",
            &format!("{}\n0.01,0.02,0.03,0.04,1,1\n", HEADER),
        );

        let report =
            load_results(tmp.path(), &experiment_grid(), DuplicatePolicy::LastWins).unwrap();
        let key = ScenarioKey::new(Design::Experiment(1), Model::A, 5000, rho(50));
        assert_eq!(report.results.metric(&key, Metric::AbBias), Some(0.01));
    }

    #[test]
    fn test_duplicate_last_in_listing_order_wins() {
        let tmp = tempdir().unwrap();
        // ".25" sorts before "0.25", so the "0.25" file is processed last
        write(
            tmp.path(),
            "endo_modelA_N500_rho.25.csv",
            &format!("{}\n1.0,1.0,1.0,1.0,1,1\n", HEADER),
        );
        write(
            tmp.path(),
            "endo_modelA_N500_rho0.25.csv",
            &format!("{}\n2.0,,2.0,,2,2\n", HEADER),
        );

        let report = load_results(tmp.path(), &grid(), DuplicatePolicy::LastWins).unwrap();
        let row = report.results.get(&endo_a_500_25()).unwrap();

        // Exactly the second file, not a merge of both
        assert_eq!(row.ab_bias, Some(2.0));
        assert_eq!(row.ab_se, None);
        assert_eq!(row.sys_se, None);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.loaded.len(), 1);

        assert_eq!(report.duplicates.len(), 1);
        let dup = &report.duplicates[0];
        assert!(dup.replaced.ends_with("endo_modelA_N500_rho.25.csv"));
        assert!(dup.kept.ends_with("endo_modelA_N500_rho0.25.csv"));
    }

    #[test]
    fn test_duplicate_is_fatal_under_error_policy() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "endo_modelA_N500_rho.25.csv", HEADER);
        write(tmp.path(), "endo_modelA_N500_rho0.25.csv", HEADER);

        let err = load_results(tmp.path(), &grid(), DuplicatePolicy::Error).unwrap_err();
        match err {
            LoadError::DuplicateKey { key, first, second } => {
                assert_eq!(key, endo_a_500_25());
                assert!(first.ends_with("endo_modelA_N500_rho.25.csv"));
                assert!(second.ends_with("endo_modelA_N500_rho0.25.csv"));
            }
        }
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let tmp = tempdir().unwrap();
        let report = load_results(
            &tmp.path().join("absent"),
            &grid(),
            DuplicatePolicy::LastWins,
        )
        .unwrap();
        assert_eq!(report.files_found, 0);
        assert!(report.results.is_empty());
    }
}
