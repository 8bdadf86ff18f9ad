use anyhow::Result;
use comfy_table::{Table, presets};
use serde::Serialize;

use crate::cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Map the `--output` flag onto a concrete format; `auto` renders for humans
    pub fn from_cli(format: cli::OutputFormat) -> Self {
        match format {
            cli::OutputFormat::Json => Self::Json,
            cli::OutputFormat::Yaml => Self::Yaml,
            cli::OutputFormat::Auto | cli::OutputFormat::Table => Self::Table,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }
}

/// Serialize `data` in the requested format
///
/// Nested documents such as credentials have no tabular shape, so human
/// output prints them as indented JSON.
pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let json_value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
    }

    Ok(())
}

/// Borderless table with the given header, in the platform CLI's listing style
pub fn print_rows(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{}", table);
}

/// `key: value` lines, aligned on the longest key
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (key, value) in fields {
        println!("{:<width$} {}", format!("{}:", key), value, width = width);
    }
}
