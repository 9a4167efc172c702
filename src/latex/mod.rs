//! LaTeX output - number formatting, templates and table rendering

pub mod number;
pub mod table;
pub mod template;

pub use number::{format_text, format_value, Alignment, FormatOptions, PLACEHOLDER};
pub use table::{write_table, RenderError, TableRenderer, TableWrap};
