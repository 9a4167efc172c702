//! Number formatting for LaTeX table cells
//!
//! Every estimate is printed with five decimals inside inline math. Values
//! too small for five decimals switch to `m \times 10^{e}` notation, and the
//! first significant decimal digit can be underlined to guide the eye.
//!
//! In [`Alignment::Aligned`] mode non-negative values carry an invisible
//! minus sign (`\phantom{-}`) so that positive and negative entries occupy the
//! same width in a centered column.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cell text for a missing value
pub const PLACEHOLDER: &str = "---";

/// Magnitudes strictly below this (and non-zero) use scientific notation
pub const SCIENTIFIC_THRESHOLD: f64 = 1e-5;

/// Digits after the decimal point in fixed-point output
pub const DECIMALS: usize = 5;

/// Invisible minus sign reserving the width of a real one
pub const PHANTOM_MINUS: &str = r"\phantom{-}";

/// How signs and leading zeros are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Plain math mode, leading zero dropped below one (`.13394`, `-.00351`)
    Math,
    /// Non-negative values padded with an invisible minus sign
    #[default]
    Aligned,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Math => write!(f, "math"),
            Alignment::Aligned => write!(f, "aligned"),
        }
    }
}

/// Formatter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub underline_first_significant: bool,
    pub alignment: Alignment,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            underline_first_significant: true,
            alignment: Alignment::Aligned,
        }
    }
}

impl FormatOptions {
    pub fn new(underline_first_significant: bool, alignment: Alignment) -> Self {
        Self {
            underline_first_significant,
            alignment,
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        match (negative, self.alignment) {
            (true, _) => "-",
            (false, Alignment::Aligned) => PHANTOM_MINUS,
            (false, Alignment::Math) => "",
        }
    }
}

/// Format an optional value as a LaTeX cell
///
/// Never fails: `None`, NaN and infinities all yield [`PLACEHOLDER`].
pub fn format_value(value: Option<f64>, opts: &FormatOptions) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return PLACEHOLDER.to_string(),
    };

    if value == 0.0 {
        return format!("${}0.{}$", opts.sign(false), "0".repeat(DECIMALS));
    }

    if value.abs() < SCIENTIFIC_THRESHOLD {
        return format_scientific(value, opts);
    }

    format_fixed(value, opts)
}

/// Format raw cell text, yielding [`PLACEHOLDER`] for anything unparsable
pub fn format_text(raw: &str, opts: &FormatOptions) -> String {
    format_value(raw.trim().parse::<f64>().ok(), opts)
}

/// 1-indexed position of the first non-zero digit in `decimals`
pub fn first_significant_decimal(decimals: &str) -> Option<usize> {
    decimals
        .chars()
        .position(|c| c.is_ascii_digit() && c != '0')
        .map(|i| i + 1)
}

fn format_scientific(value: f64, opts: &FormatOptions) -> String {
    let rendered = format!("{:.2e}", value.abs());
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    format!(
        "${}{} \\times 10^{{{}}}$",
        opts.sign(value < 0.0),
        mantissa,
        exponent
    )
}

fn format_fixed(value: f64, opts: &FormatOptions) -> String {
    let rendered = format!("{:.*}", DECIMALS, value.abs());
    let (integer, decimals) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let integer = if opts.alignment == Alignment::Math && integer == "0" {
        ""
    } else {
        integer
    };

    let decimals = match first_significant_decimal(decimals) {
        Some(pos) if opts.underline_first_significant => {
            let (before, rest) = decimals.split_at(pos - 1);
            let (digit, after) = rest.split_at(1);
            format!("{}\\underline{{{}}}{}", before, digit, after)
        }
        _ => decimals.to_string(),
    };

    format!("${}{}.{}$", opts.sign(value < 0.0), integer, decimals)
}
