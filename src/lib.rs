//! mctab: Monte Carlo result tables
//!
//! Turns per-scenario simulation results stored as CSV files into
//! publication-ready LaTeX tables.

pub mod cli;
pub mod core;
pub mod latex;
