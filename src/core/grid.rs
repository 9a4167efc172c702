//! Expected parameter grids and the completeness check
//!
//! A grid is the Cartesian product of every valid value per key dimension.
//! It drives both missing-file detection and the rendering order.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::core::loader::list_result_files;
use crate::core::scenario::{Design, Model, Rho, ScenarioKey, Selection};

/// Cartesian product of the valid values for one table variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedGrid {
    pub designs: Vec<Design>,
    pub models: Vec<Model>,
    pub sample_sizes: Vec<u32>,
    pub rhos: Vec<Rho>,
}

impl ExpectedGrid {
    /// Every key, walked design → model → sample size → rho
    pub fn keys(&self) -> impl Iterator<Item = ScenarioKey> + '_ {
        self.designs.iter().flat_map(move |&design| {
            self.models.iter().flat_map(move |&model| {
                self.sample_sizes.iter().flat_map(move |&n| {
                    self.rhos
                        .iter()
                        .map(move |&rho| ScenarioKey::new(design, model, n, rho))
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.designs.len() * self.models.len() * self.sample_sizes.len() * self.rhos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &ScenarioKey) -> bool {
        self.designs.contains(&key.design)
            && self.models.contains(&key.model)
            && self.sample_sizes.contains(&key.sample_size)
            && self.rhos.contains(&key.rho)
    }

    /// Map a decoded key onto this grid
    ///
    /// Experiment grids treat `endo` files as experiment 1. Returns `None`
    /// when the key has no place in the grid.
    pub fn resolve(&self, key: ScenarioKey) -> Option<ScenarioKey> {
        if self.contains(&key) {
            return Some(key);
        }
        if key.design == Design::Selection(Selection::Endogenous) {
            let aliased = ScenarioKey {
                design: Design::Experiment(1),
                ..key
            };
            if self.contains(&aliased) {
                return Some(aliased);
            }
        }
        None
    }
}

/// One expected combination with no file on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    pub key: ScenarioKey,
    /// Filenames that would have satisfied the check
    pub tried: Vec<String>,
}

impl MissingEntry {
    /// Canonical filename for diagnostics
    pub fn expected_filename(&self) -> &str {
        self.tried.first().map(String::as_str).unwrap_or_default()
    }
}

/// Outcome of a completeness check
#[derive(Debug, Clone, Default, Serialize)]
pub struct Completeness {
    pub expected: usize,
    /// Missing combinations, in grid order
    pub missing: Vec<MissingEntry>,
}

impl Completeness {
    pub fn found(&self) -> usize {
        self.expected - self.missing.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn is_missing(&self, key: &ScenarioKey) -> bool {
        self.missing.iter().any(|m| m.key == *key)
    }
}

/// Check which expected combinations have a result file in `dir`
///
/// Filenames are decoded with the same rules the loader applies, so any
/// accepted spelling of a key counts as present. A missing or unreadable
/// directory means every key is missing. File contents are not inspected.
pub fn check_completeness(grid: &ExpectedGrid, dir: &Path) -> Completeness {
    let present: BTreeSet<ScenarioKey> = list_result_files(dir)
        .iter()
        .filter_map(|path| path.file_name())
        .filter_map(|name| ScenarioKey::from_filename(&name.to_string_lossy()).ok())
        .filter_map(|key| grid.resolve(key))
        .collect();

    let missing = grid
        .keys()
        .filter(|key| !present.contains(key))
        .map(|key| MissingEntry {
            key,
            tried: key.candidate_filenames(),
        })
        .collect();

    Completeness {
        expected: grid.len(),
        missing,
    }
}
