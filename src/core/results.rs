//! Result rows and the scenario lookup table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::scenario::ScenarioKey;

/// One of the six metrics a result file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    AbBias,
    AbSe,
    SysBias,
    SysSe,
    AbValid,
    SysValid,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::AbBias,
        Metric::AbSe,
        Metric::SysBias,
        Metric::SysSe,
        Metric::AbValid,
        Metric::SysValid,
    ];

    /// CSV column header for this metric
    pub fn column(self) -> &'static str {
        match self {
            Metric::AbBias => "AB_bias",
            Metric::AbSe => "AB_se",
            Metric::SysBias => "SYS_bias",
            Metric::SysSe => "SYS_se",
            Metric::AbValid => "AB_valid",
            Metric::SysValid => "SYS_valid",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Metrics read from one result file
///
/// An absent metric is `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub ab_bias: Option<f64>,
    pub ab_se: Option<f64>,
    pub sys_bias: Option<f64>,
    pub sys_se: Option<f64>,
    pub ab_valid: Option<f64>,
    pub sys_valid: Option<f64>,
}

impl ResultRow {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AbBias => self.ab_bias,
            Metric::AbSe => self.ab_se,
            Metric::SysBias => self.sys_bias,
            Metric::SysSe => self.sys_se,
            Metric::AbValid => self.ab_valid,
            Metric::SysValid => self.sys_valid,
        }
    }

    /// Store a metric; non-finite values are stored as absent
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match metric {
            Metric::AbBias => &mut self.ab_bias,
            Metric::AbSe => &mut self.ab_se,
            Metric::SysBias => &mut self.sys_bias,
            Metric::SysSe => &mut self.sys_se,
            Metric::AbValid => &mut self.ab_valid,
            Metric::SysValid => &mut self.sys_valid,
        };
        *slot = value;
    }

    /// A scenario counts as available once its AB bias is known
    pub fn is_available(&self) -> bool {
        self.ab_bias.is_some()
    }
}

/// Lookup from scenario to its metrics
///
/// Built once by the loader, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: BTreeMap<ScenarioKey, ResultRow>,
}

#[derive(Serialize)]
struct Entry<'a> {
    #[serde(flatten)]
    key: &'a ScenarioKey,
    #[serde(flatten)]
    row: &'a ResultRow,
}

// Struct keys cannot be JSON object keys, so entries go out as a list
impl Serialize for ResultTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|(key, row)| Entry { key, row }))
    }
}

impl ResultTable {
    /// Insert a row, returning the row it replaced
    pub(crate) fn insert(&mut self, key: ScenarioKey, row: ResultRow) -> Option<ResultRow> {
        self.rows.insert(key, row)
    }

    pub fn get(&self, key: &ScenarioKey) -> Option<&ResultRow> {
        self.rows.get(key)
    }

    /// Look up a single metric, `None` when the scenario or the metric is absent
    pub fn metric(&self, key: &ScenarioKey, metric: Metric) -> Option<f64> {
        self.rows.get(key).and_then(|row| row.get(metric))
    }

    pub fn contains(&self, key: &ScenarioKey) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioKey, &ResultRow)> {
        self.rows.iter()
    }
}

impl FromIterator<(ScenarioKey, ResultRow)> for ResultTable {
    fn from_iter<I: IntoIterator<Item = (ScenarioKey, ResultRow)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::{Design, Model, Rho, Selection};

    fn key() -> ScenarioKey {
        ScenarioKey::new(
            Design::Selection(Selection::Endogenous),
            Model::A,
            500,
            Rho::from_hundredths(25).unwrap(),
        )
    }

    #[test]
    fn test_set_drops_non_finite() {
        let mut row = ResultRow::default();
        row.set(Metric::AbBias, Some(f64::NAN));
        row.set(Metric::AbSe, Some(f64::INFINITY));
        row.set(Metric::SysBias, Some(-0.25));
        assert_eq!(row.ab_bias, None);
        assert_eq!(row.ab_se, None);
        assert_eq!(row.get(Metric::SysBias), Some(-0.25));
        assert!(!row.is_available());
    }

    #[test]
    fn test_metric_lookup() {
        let mut row = ResultRow::default();
        row.set(Metric::AbBias, Some(0.1));
        let table: ResultTable = [(key(), row)].into_iter().collect();

        assert_eq!(table.metric(&key(), Metric::AbBias), Some(0.1));
        assert_eq!(table.metric(&key(), Metric::SysSe), None);
        assert!(table.get(&key()).unwrap().is_available());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = ResultTable::default();
        let mut first = ResultRow::default();
        first.set(Metric::AbBias, Some(1.0));
        let mut second = ResultRow::default();
        second.set(Metric::SysBias, Some(2.0));

        assert!(table.insert(key(), first).is_none());
        assert_eq!(table.insert(key(), second), Some(first));
        assert_eq!(table.get(&key()), Some(&second));
    }

    #[test]
    fn test_json_lists_entries() {
        let mut row = ResultRow::default();
        row.set(Metric::AbBias, Some(0.5));
        let table: ResultTable = [(key(), row)].into_iter().collect();

        let json = serde_json::to_value(&table).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["model"], "A");
        assert_eq!(entries[0]["sample_size"], 500);
        assert_eq!(entries[0]["rho"], 25);
        assert_eq!(entries[0]["ab_bias"], 0.5);
        assert!(entries[0]["sys_se"].is_null());
    }
}
