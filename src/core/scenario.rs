//! Scenario keys - the parameters encoded in a simulation result filename
//!
//! Filenames follow `<design>_model<letter>_N<integer>_rho<decimal>.csv`,
//! where `<design>` is `endo`, `nonendo` or `exp<k>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of `_`-separated fields in a result filename stem
pub const FILENAME_FIELDS: usize = 4;

/// Highest experiment index used by the experiment tables
pub const MAX_EXPERIMENT: u8 = 5;

/// Errors from decoding a result filename
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioParseError {
    #[error("expected {expected} '_'-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unknown design prefix '{0}' (expected endo, nonendo or exp<k>)")]
    UnknownDesign(String),

    #[error("experiment index out of range: '{0}'")]
    BadExperiment(String),

    #[error("invalid model field '{0}' (expected modelA or modelB)")]
    BadModel(String),

    #[error("invalid sample size field '{0}'")]
    BadSampleSize(String),

    #[error("invalid correlation field '{0}'")]
    BadRho(String),
}

/// Sample-selection mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// No endogenous selection (baseline)
    Exogenous,
    /// Selection correlated with the outcome
    Endogenous,
}

impl Selection {
    /// Filename prefix for this selection type
    pub fn prefix(self) -> &'static str {
        match self {
            Selection::Exogenous => "nonendo",
            Selection::Endogenous => "endo",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Exogenous => write!(f, "nonendogenous"),
            Selection::Endogenous => write!(f, "endogenous"),
        }
    }
}

/// Which experimental design a scenario belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Design {
    Selection(Selection),
    Experiment(u8),
}

impl Design {
    /// Every filename prefix that names this design
    ///
    /// Experiment 1 is the baseline endogenous experiment, so `endo` files
    /// count for it as well.
    pub fn filename_prefixes(self) -> Vec<String> {
        match self {
            Design::Selection(selection) => vec![selection.prefix().to_string()],
            Design::Experiment(1) => vec!["exp1".to_string(), "endo".to_string()],
            Design::Experiment(k) => vec![format!("exp{}", k)],
        }
    }

    /// Upper-case roman numeral for an experiment index
    pub fn roman(self) -> Option<&'static str> {
        match self {
            Design::Experiment(k) => {
                let index = usize::from(k).checked_sub(1)?;
                ["I", "II", "III", "IV", "V"].get(index).copied()
            }
            Design::Selection(_) => None,
        }
    }
}

impl FromStr for Design {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "endo" => Ok(Design::Selection(Selection::Endogenous)),
            "nonendo" => Ok(Design::Selection(Selection::Exogenous)),
            _ => {
                let digits = s
                    .strip_prefix("exp")
                    .ok_or_else(|| ScenarioParseError::UnknownDesign(s.to_string()))?;
                match digits.parse::<u8>() {
                    Ok(k) if (1..=MAX_EXPERIMENT).contains(&k) => Ok(Design::Experiment(k)),
                    _ => Err(ScenarioParseError::BadExperiment(s.to_string())),
                }
            }
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Design::Selection(selection) => write!(f, "{}", selection),
            Design::Experiment(k) => write!(f, "experiment {}", k),
        }
    }
}

/// Model variant of the data-generating process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Model {
    A,
    B,
}

impl Model {
    pub fn letter(self) -> &'static str {
        match self {
            Model::A => "A",
            Model::B => "B",
        }
    }
}

impl FromStr for Model {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Model::A),
            "B" => Ok(Model::B),
            _ => Err(ScenarioParseError::BadModel(s.to_string())),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Correlation parameter, held as a whole number of hundredths
///
/// Stored as an integer so keys can be hashed and ordered; every value the
/// simulations use is an exact number of hundredths in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rho(u8);

impl Rho {
    /// Build from hundredths (25 means 0.25). Returns `None` outside [0, 1).
    pub const fn from_hundredths(hundredths: u8) -> Option<Self> {
        if hundredths < 100 {
            Some(Rho(hundredths))
        } else {
            None
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Fractional digits with trailing zeros removed ("25", "5", "0")
    fn trimmed_digits(self) -> String {
        let two = format!("{:02}", self.0);
        let trimmed = two.trim_end_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Decimal spellings a filename may use for this value
    ///
    /// Ordered from the canonical two-digit form to the shortest form.
    pub fn filename_spellings(self) -> Vec<String> {
        let two = format!("{:02}", self.0);
        let short = self.trimmed_digits();
        let mut spellings = vec![
            format!("0.{}", two),
            format!("0.{}", short),
            format!(".{}", two),
            format!(".{}", short),
        ];
        // "0.25" and ".25" have no shorter form; duplicates are always adjacent
        spellings.dedup();
        spellings
    }

    /// Row label in the econometrics display style: `$.25$`
    pub fn latex_label(self) -> String {
        format!("$.{:02}$", self.0)
    }

    /// Short decimal form used in column headers: `0.25`, `0.5`
    pub fn short(self) -> String {
        format!("0.{}", self.trimmed_digits())
    }
}

impl FromStr for Rho {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ScenarioParseError::BadRho(s.to_string());

        // Only plain decimals; rejects signs, exponents, "inf" and "NaN"
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(bad());
        }

        let value: f64 = s.parse().map_err(|_| bad())?;
        if !(0.0..1.0).contains(&value) {
            return Err(bad());
        }

        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-9 {
            return Err(bad());
        }

        Rho::from_hundredths(rounded as u8).ok_or_else(bad)
    }
}

impl fmt::Display for Rho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Unique identifier of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub design: Design,
    pub model: Model,
    pub sample_size: u32,
    pub rho: Rho,
}

impl ScenarioKey {
    pub fn new(design: Design, model: Model, sample_size: u32, rho: Rho) -> Self {
        Self {
            design,
            model,
            sample_size,
            rho,
        }
    }

    /// Decode a key from a result filename (with or without extension)
    pub fn from_filename(filename: &str) -> Result<Self, ScenarioParseError> {
        let stem = match filename.rsplit_once('.') {
            Some((stem, ext)) if ext.eq_ignore_ascii_case("csv") => stem,
            _ => filename,
        };

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != FILENAME_FIELDS {
            return Err(ScenarioParseError::FieldCount {
                expected: FILENAME_FIELDS,
                found: parts.len(),
            });
        }

        let design: Design = parts[0].parse()?;

        let model: Model = parts[1]
            .strip_prefix("model")
            .ok_or_else(|| ScenarioParseError::BadModel(parts[1].to_string()))?
            .parse()
            .map_err(|_| ScenarioParseError::BadModel(parts[1].to_string()))?;

        let sample_size = parts[2]
            .strip_prefix('N')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| ScenarioParseError::BadSampleSize(parts[2].to_string()))?;

        let rho: Rho = parts[3]
            .strip_prefix("rho")
            .ok_or_else(|| ScenarioParseError::BadRho(parts[3].to_string()))?
            .parse()
            .map_err(|_| ScenarioParseError::BadRho(parts[3].to_string()))?;

        Ok(Self::new(design, model, sample_size, rho))
    }

    /// Every filename that encodes this key under the accepted conventions
    pub fn candidate_filenames(&self) -> Vec<String> {
        let mut names = Vec::new();
        for prefix in self.design.filename_prefixes() {
            for rho in self.rho.filename_spellings() {
                names.push(format!(
                    "{}_model{}_N{}_rho{}.csv",
                    prefix, self.model, self.sample_size, rho
                ));
            }
        }
        names
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, model {}, N={}, rho={}",
            self.design, self.model, self.sample_size, self.rho
        )
    }
}
