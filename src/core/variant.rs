//! Table variants - the fixed table layouts this tool reproduces

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::grid::ExpectedGrid;
use crate::core::scenario::{Design, Model, Rho, Selection, MAX_EXPERIMENT};

/// Correlation values shared by every table
const RHO_HUNDREDTHS: [u8; 3] = [25, 50, 75];

/// Identifier of a table variant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TableId {
    /// Endogenous vs. no endogenous selection, N = 500 and 5000
    #[value(name = "table1")]
    Table1,
    /// Five experiments at N = 500
    #[value(name = "table2")]
    Table2,
    /// Five experiments at N = 5000
    #[value(name = "table3")]
    Table3,
}

impl TableId {
    pub const ALL: [TableId; 3] = [TableId::Table1, TableId::Table2, TableId::Table3];

    pub fn as_str(self) -> &'static str {
        match self {
            TableId::Table1 => "table1",
            TableId::Table2 => "table2",
            TableId::Table3 => "table3",
        }
    }

    /// Full descriptor for this variant
    pub fn spec(self) -> TableSpec {
        match self {
            TableId::Table1 => TableSpec {
                id: self,
                title: "Table 1: AB and SYS estimators with and without endogenous selection"
                    .to_string(),
                layout: Layout::SelectionComparison,
                grid: ExpectedGrid {
                    designs: vec![
                        Design::Selection(Selection::Exogenous),
                        Design::Selection(Selection::Endogenous),
                    ],
                    models: vec![Model::A, Model::B],
                    sample_sizes: vec![500, 5000],
                    rhos: rhos(),
                },
            },
            TableId::Table2 => experiment_spec(self, "Table 2", 500),
            TableId::Table3 => experiment_spec(self, "Table 3", 5000),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How rows and columns of a table are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Rows by model → N → rho; columns compare no endogenous vs. endogenous selection
    SelectionComparison,
    /// Rows by experiment → model; rho values as column groups
    Experiments,
}

/// Descriptor of one table variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub id: TableId,
    pub title: String,
    pub layout: Layout,
    pub grid: ExpectedGrid,
}

impl TableSpec {
    /// Column count of the rendered `tabular`
    pub fn column_count(&self) -> usize {
        match self.layout {
            Layout::SelectionComparison => 7,
            Layout::Experiments => 2 + 2 * self.grid.rhos.len(),
        }
    }
}

fn rhos() -> Vec<Rho> {
    RHO_HUNDREDTHS
        .iter()
        .filter_map(|&h| Rho::from_hundredths(h))
        .collect()
}

fn experiment_spec(id: TableId, name: &str, n: u32) -> TableSpec {
    TableSpec {
        id,
        title: format!("{}: AB and SYS estimators across experiments, N = {}", name, n),
        layout: Layout::Experiments,
        grid: ExpectedGrid {
            designs: (1..=MAX_EXPERIMENT).map(Design::Experiment).collect(),
            models: vec![Model::A, Model::B],
            sample_sizes: vec![n],
            rhos: rhos(),
        },
    }
}

/// Human description of an experiment, as printed in the table
pub fn experiment_description(index: u8) -> &'static str {
    match index {
        1 => r"Very short $T$ ($T = 4$)",
        2 => r"More sample selection (25\%)",
        3 => r"Increasing the ratio of variances: $\sigma_\eta/\sigma_\varepsilon = 2$",
        4 => r"Reducing the correlation of the errors: $\rho = 0.25$",
        5 => "Non-stationary time-varying error components",
        _ => "",
    }
}
