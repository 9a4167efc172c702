//! Table renderer - walks a variant's grid and fills its LaTeX template
//!
//! Every cell is formatted up front; the templates only arrange sections and
//! rows. Missing scenarios and metrics become placeholder cells.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::results::{Metric, ResultTable};
use crate::core::scenario::{Design, Model, ScenarioKey, Selection};
use crate::core::variant::{experiment_description, Layout, TableSpec};
use crate::latex::number::{format_value, FormatOptions};
use crate::latex::template::{template_name, TemplateError, TemplateSet};

/// LaTeX packages the emitted markup needs
pub const REQUIRED_PACKAGES: [&str; 3] = ["booktabs", "array", "ulem"];

/// `\usepackage` line for every required package
pub fn package_imports() -> Vec<String> {
    REQUIRED_PACKAGES
        .iter()
        .map(|name| format!("\\usepackage{{{}}}", name))
        .collect()
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Surrounding `table` float for the emitted `tabular`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableWrap {
    pub caption: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
struct Row {
    lead: String,
    cells: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Section {
    heading: String,
    rows: Vec<Row>,
    /// Followed by extra vertical space
    spaced: bool,
}

/// Renders result tables into LaTeX source
pub struct TableRenderer {
    templates: TemplateSet,
    options: FormatOptions,
}

impl TableRenderer {
    pub fn new(options: FormatOptions) -> Result<Self, RenderError> {
        Ok(Self {
            templates: TemplateSet::new()?,
            options,
        })
    }

    /// Render a table; the output always ends with exactly one newline
    pub fn render(
        &self,
        spec: &TableSpec,
        results: &ResultTable,
        wrap: Option<&TableWrap>,
    ) -> Result<String, RenderError> {
        let mut context = tera::Context::new();
        context.insert("title", &spec.title);
        context.insert("columns", &spec.column_count());
        context.insert("packages", &package_imports());

        let sections = match spec.layout {
            Layout::SelectionComparison => self.selection_sections(spec, results),
            Layout::Experiments => {
                self.insert_group_headers(spec, &mut context);
                self.experiment_sections(spec, results)
            }
        };
        context.insert("sections", &sections);

        let tabular = self
            .templates
            .render(template_name(spec.layout), &context)?;
        let tabular = tabular.trim_end();

        let mut out = match wrap {
            Some(wrap) => format!(
                "\\begin{{table}}[htbp]\n\\centering\n\\caption{{{}}}\n\\label{{{}}}\n{}\n\\end{{table}}",
                wrap.caption, wrap.label, tabular
            ),
            None => tabular.to_string(),
        };
        out.push('\n');
        Ok(out)
    }

    fn cell(&self, results: &ResultTable, key: &ScenarioKey, metric: Metric) -> String {
        format_value(results.metric(key, metric), &self.options)
    }

    /// Model → N blocks, one bias and one s.e. row per rho
    fn selection_sections(&self, spec: &TableSpec, results: &ResultTable) -> Vec<Section> {
        let grid = &spec.grid;
        let designs = [
            Design::Selection(Selection::Exogenous),
            Design::Selection(Selection::Endogenous),
        ];

        let mut sections = Vec::new();
        for &model in &grid.models {
            for &n in &grid.sample_sizes {
                let mut rows = Vec::new();
                for &rho in &grid.rhos {
                    let keys = designs.map(|design| ScenarioKey::new(design, model, n, rho));
                    let cells = |bias: Metric, sys: Metric| -> Vec<String> {
                        keys.iter()
                            .flat_map(|key| [self.cell(results, key, bias), self.cell(results, key, sys)])
                            .collect()
                    };

                    rows.push(Row {
                        lead: format!("{} & {} & bias", model, rho.latex_label()),
                        cells: cells(Metric::AbBias, Metric::SysBias),
                    });
                    rows.push(Row {
                        lead: "& & s.e.".to_string(),
                        cells: cells(Metric::AbSe, Metric::SysSe),
                    });
                }
                sections.push(Section {
                    heading: format!("$N = {}$", n),
                    rows,
                    spaced: false,
                });
            }
        }
        sections
    }

    /// One block per experiment, rho values across the columns
    fn experiment_sections(&self, spec: &TableSpec, results: &ResultTable) -> Vec<Section> {
        let grid = &spec.grid;
        let count = grid.designs.len();

        grid.designs
            .iter()
            .enumerate()
            .map(|(i, &design)| {
                let mut rows = Vec::new();
                for &model in &grid.models {
                    for &n in &grid.sample_sizes {
                        rows.extend(self.experiment_rows(spec, results, design, model, n));
                    }
                }
                Section {
                    heading: experiment_heading(design),
                    rows,
                    spaced: i + 1 < count,
                }
            })
            .collect()
    }

    fn experiment_rows(
        &self,
        spec: &TableSpec,
        results: &ResultTable,
        design: Design,
        model: Model,
        n: u32,
    ) -> [Row; 2] {
        let cells = |bias: Metric, sys: Metric| -> Vec<String> {
            spec.grid
                .rhos
                .iter()
                .map(|&rho| ScenarioKey::new(design, model, n, rho))
                .flat_map(|key| [self.cell(results, &key, bias), self.cell(results, &key, sys)])
                .collect()
        };

        [
            Row {
                lead: format!("{} & bias", model),
                cells: cells(Metric::AbBias, Metric::SysBias),
            },
            Row {
                lead: "& s.e.".to_string(),
                cells: cells(Metric::AbSe, Metric::SysSe),
            },
        ]
    }

    fn insert_group_headers(&self, spec: &TableSpec, context: &mut tera::Context) {
        let rhos = &spec.grid.rhos;

        let column_spec = format!("@{{}}ll*{{{}}}{{c}}@{{}}", 2 * rhos.len());
        let group_headers: Vec<String> = rhos
            .iter()
            .map(|rho| format!("\\multicolumn{{2}}{{c}}{{$\\rho = {}$}}", rho.short()))
            .collect();
        let group_rules: Vec<String> = (0..rhos.len())
            .map(|i| format!("\\cmidrule(lr){{{}-{}}}", 3 + 2 * i, 4 + 2 * i))
            .collect();
        let estimator_headers: Vec<&str> = rhos.iter().flat_map(|_| ["AB", "SYS"]).collect();

        context.insert("column_spec", &column_spec);
        context.insert("group_headers", &group_headers);
        context.insert("group_rules", &group_rules);
        context.insert("estimator_headers", &estimator_headers);
    }
}

fn experiment_heading(design: Design) -> String {
    match design {
        Design::Experiment(k) => format!(
            "Experiment {}: {}",
            design.roman().unwrap_or("?"),
            experiment_description(k)
        ),
        Design::Selection(selection) => format!("{} selection", selection),
    }
}

/// Write rendered LaTeX to `path`, creating parent directories
pub fn write_table(path: &Path, content: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RenderError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::results::ResultRow;
    use crate::core::scenario::Rho;
    use crate::core::variant::TableId;
    use crate::latex::number::PLACEHOLDER;
    use tempfile::tempdir;

    fn rho(h: u8) -> Rho {
        Rho::from_hundredths(h).unwrap()
    }

    fn row(ab_bias: f64, ab_se: f64, sys_bias: f64, sys_se: f64) -> ResultRow {
        let mut row = ResultRow::default();
        row.set(Metric::AbBias, Some(ab_bias));
        row.set(Metric::AbSe, Some(ab_se));
        row.set(Metric::SysBias, Some(sys_bias));
        row.set(Metric::SysSe, Some(sys_se));
        row
    }

    fn renderer() -> TableRenderer {
        TableRenderer::new(FormatOptions::default()).unwrap()
    }

    #[test]
    fn test_selection_table_rows() {
        let key = ScenarioKey::new(Design::Selection(Selection::Exogenous), Model::A, 500, rho(25));
        let results: ResultTable = [(key, row(0.00351, 0.31394, -0.31394, 0.0))]
            .into_iter()
            .collect();

        let out = renderer()
            .render(&TableId::Table1.spec(), &results, None)
            .unwrap();

        assert!(out.contains(concat!(
            r"A & $.25$ & bias & $\phantom{-}0.00\underline{3}51$ & $-0.\underline{3}1394$",
            r" & --- & --- \\"
        )));
        assert!(out.contains(concat!(
            r"& & s.e. & $\phantom{-}0.\underline{3}1394$ & $\phantom{-}0.00000$",
            r" & --- & --- \\"
        )));
        assert!(out.contains("\\midrule\n\\multicolumn{7}{c}{$N = 500$} \\\\\n\\midrule\n"));
        assert!(out.contains(r"\multicolumn{7}{c}{$N = 5000$} \\"));
        assert_eq!(out.matches(" & bias & ").count(), 12);
        assert_eq!(out.matches("& & s.e. & ").count(), 12);
    }

    #[test]
    fn test_selection_walk_order() {
        let out = renderer()
            .render(&TableId::Table1.spec(), &ResultTable::default(), None)
            .unwrap();

        let a500 = out.find("A & $.25$").unwrap();
        let n5000 = out.find("$N = 5000$").unwrap();
        let b = out.find("B & $.25$").unwrap();
        assert!(a500 < n5000 && n5000 < b);
        assert!(out.find("A & $.50$").unwrap() < out.find("A & $.75$").unwrap());
    }

    #[test]
    fn test_empty_results_render_placeholders() {
        for id in TableId::ALL {
            let out = renderer()
                .render(&id.spec(), &ResultTable::default(), None)
                .unwrap();
            assert!(out.contains(PLACEHOLDER));
            assert!(!out.contains(r"\underline"));
            assert!(out.starts_with("% Table"));
            assert!(out.contains(r"\begin{tabular}"));
            assert!(out.ends_with("\\end{tabular}\n"));
        }
    }

    #[test]
    fn test_header_lists_required_packages() {
        for id in TableId::ALL {
            let out = renderer()
                .render(&id.spec(), &ResultTable::default(), None)
                .unwrap();
            let second = out.lines().nth(1).unwrap();
            assert_eq!(
                second,
                r"% Requires \usepackage{booktabs}, \usepackage{array}, \usepackage{ulem}"
            );
        }
        assert_eq!(package_imports().len(), REQUIRED_PACKAGES.len());
    }

    #[test]
    fn test_experiment_table_layout() {
        let key = ScenarioKey::new(Design::Experiment(1), Model::B, 5000, rho(75));
        let results: ResultTable = [(key, row(-2.34e-6, 0.5, 0.1, 0.2))].into_iter().collect();

        let out = renderer()
            .render(&TableId::Table3.spec(), &results, None)
            .unwrap();

        assert!(out.contains("\\begin{tabular}{@{}ll*{6}{c}@{}}\n"));
        assert!(out.contains(concat!(
            r"& & \multicolumn{2}{c}{$\rho = 0.25$} & \multicolumn{2}{c}{$\rho = 0.5$}",
            r" & \multicolumn{2}{c}{$\rho = 0.75$} \\"
        )));
        assert!(out.contains(r"\cmidrule(lr){3-4} \cmidrule(lr){5-6} \cmidrule(lr){7-8}"));
        assert!(out.contains(r"Model & & AB & SYS & AB & SYS & AB & SYS \\"));
        assert!(out.contains("\\multicolumn{8}{c}{Experiment I: Very short $T$ ($T = 4$)} \\\\\nA & bias & "));
        assert!(out.contains(r"\multicolumn{8}{c}{Experiment V: Non-stationary time-varying error components} \\"));
        assert!(out.contains(concat!(
            r"B & bias & --- & --- & --- & --- & $-2.34 \times 10^{-6}$",
            r" & $\phantom{-}0.\underline{1}0000$ \\"
        )));

        // Four spacers between five experiments
        assert_eq!(out.matches(r"\addlinespace").count(), 4);
        assert!(out.contains("\\addlinespace\n\\multicolumn{8}{c}{Experiment II"));
        assert!(out.contains("\\\\\n\\bottomrule\n\\end{tabular}\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let key = ScenarioKey::new(Design::Selection(Selection::Endogenous), Model::B, 5000, rho(50));
        let results: ResultTable = [(key, row(0.1, 0.2, 0.3, 0.4))].into_iter().collect();
        let spec = TableId::Table1.spec();

        let first = renderer().render(&spec, &results, None).unwrap();
        let second = renderer().render(&spec, &results, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrap_in_table_float() {
        let wrap = TableWrap {
            caption: "Monte Carlo results".to_string(),
            label: "tab:mc".to_string(),
        };
        let out = renderer()
            .render(&TableId::Table2.spec(), &ResultTable::default(), Some(&wrap))
            .unwrap();

        assert!(out.starts_with("\\begin{table}[htbp]\n\\centering\n\\caption{Monte Carlo results}\n\\label{tab:mc}\n% Table 2"));
        assert!(out.ends_with("\\end{tabular}\n\\end{table}\n"));
    }

    #[test]
    fn test_write_table_creates_directories() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("output/tables/table1.tex");

        write_table(&path, "content\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content\n");

        // Overwrites on re-run
        write_table(&path, "again\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "again\n");
    }

    #[test]
    fn test_write_table_fails_when_parent_is_a_file() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_table(&blocker.join("table.tex"), "x").unwrap_err();
        assert!(matches!(err, RenderError::CreateDir { .. }));
    }
}
