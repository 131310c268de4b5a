//! Output formatting: table, JSON, YAML.
//!
//! Tables use `tabled`; structured formats serialize the underlying data
//! with serde so scripts see every field.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Color only interactive stdout, and never when `NO_COLOR` is set.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Render a count, green when non-zero.
pub fn good(count: usize, color: bool) -> String {
    if color && count > 0 {
        count.green().to_string()
    } else {
        count.to_string()
    }
}

/// Render a count, red when non-zero.
pub fn bad(count: usize, color: bool) -> String {
    if color && count > 0 {
        count.red().bold().to_string()
    } else {
        count.to_string()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of rows. `table` goes through `to_row`; other formats
/// serialize `data` directly.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Render one value. `table` uses a pre-formatted `detail_fn` view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print to stdout. Empty output prints nothing.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(data).map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        name: &'static str,
        count: usize,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![Item { name: "clients_active", count: 2 }]
    }

    #[test]
    fn table_uses_row_mapping() {
        let out = render_list(OutputFormat::Table, &items(), |i| Row { name: i.name.into() })
            .expect("renderable");
        assert!(out.contains("Name"));
        assert!(out.contains("clients_active"));
        assert!(!out.contains("count"));
    }

    #[test]
    fn structured_formats_keep_all_fields() {
        let json = render_list(OutputFormat::Json, &items(), |i| Row { name: i.name.into() })
            .expect("renderable");
        assert!(json.contains("\"count\": 2"));

        let yaml = render_list(OutputFormat::Yaml, &items(), |i| Row { name: i.name.into() })
            .expect("renderable");
        assert!(yaml.contains("count: 2"));
    }

    #[test]
    fn counts_without_color_are_plain() {
        assert_eq!(good(3, false), "3");
        assert_eq!(bad(0, true), "0");
    }
}
