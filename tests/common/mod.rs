//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const HEADER: &str = "AB_bias,AB_se,SYS_bias,SYS_se,AB_valid,SYS_valid";

/// Row used by every fixture file unless a test writes its own
pub const DEFAULT_ROW: &str = "0.13394,0.02,-0.00351,0.01,0.95,0.94";

pub const RHOS: [&str; 3] = ["0.25", "0.5", "0.75"];

/// mctab command isolated from any ambient config
pub fn mctab() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("mctab"));
    cmd.env_remove("MCTAB_CONFIG");
    cmd
}

/// Write one result file with the given data row
pub fn write_result(dir: &Path, name: &str, row: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), format!("{}\n{}\n", HEADER, row)).unwrap();
}

/// Every result file table2 (or table3, with `n = 5000`) expects
pub fn experiment_filenames(n: u32) -> Vec<String> {
    let mut names = Vec::new();
    for k in 1..=5 {
        for model in ["A", "B"] {
            for rho in RHOS {
                names.push(format!("exp{}_model{}_N{}_rho{}.csv", k, model, n, rho));
            }
        }
    }
    names
}

/// Every result file table1 expects
pub fn selection_filenames() -> Vec<String> {
    let mut names = Vec::new();
    for design in ["nonendo", "endo"] {
        for model in ["A", "B"] {
            for n in [500, 5000] {
                for rho in RHOS {
                    names.push(format!("{}_model{}_N{}_rho{}.csv", design, model, n, rho));
                }
            }
        }
    }
    names
}

/// Temp project with a complete grid under `output/partial_tab2`
pub fn setup_table2_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("output/partial_tab2");
    for name in experiment_filenames(500) {
        write_result(&dir, &name, DEFAULT_ROW);
    }
    tmp
}

/// Temp project with a complete grid under `output/partial`
pub fn setup_table1_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("output/partial");
    for name in selection_filenames() {
        write_result(&dir, &name, DEFAULT_ROW);
    }
    tmp
}
