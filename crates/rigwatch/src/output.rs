//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use rigwatch_core::Field;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Placeholder shown in tables for unavailable fields.
const MISSING: &str = "-";

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// `online` in green or `offline` in red.
pub fn online_badge(online: bool, color: bool) -> String {
    match (online, color) {
        (true, true) => "online".green().bold().to_string(),
        (false, true) => "offline".red().bold().to_string(),
        (true, false) => "online".into(),
        (false, false) => "offline".into(),
    }
}

/// Highlight a value when `hot` is set.
pub fn warn_if(text: String, hot: bool, color: bool) -> String {
    if hot && color {
        text.yellow().bold().to_string()
    } else {
        text
    }
}

// ── Field formatting ─────────────────────────────────────────────────

/// A field's value, or `-` when unavailable.
pub fn field<T: Display>(value: &Field<T>) -> String {
    value.get().map_or_else(|| MISSING.into(), ToString::to_string)
}

/// A numeric field with a unit suffix, e.g. `65 °C`.
pub fn field_with_unit(value: &Field<f64>, unit: &str) -> String {
    value.get().map_or_else(|| MISSING.into(), |v| format!("{v} {unit}"))
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
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
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Render rows as a rounded table.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_fields_render_as_dash() {
        assert_eq!(field(&Field::<i64>::Unavailable), "-");
        assert_eq!(field(&Field::Available(3)), "3");
        assert_eq!(field_with_unit(&Field::Available(65.0), "°C"), "65 °C");
        assert_eq!(field_with_unit(&Field::Unavailable, "W"), "-");
    }

    #[test]
    fn plain_badge_without_color() {
        assert_eq!(online_badge(true, false), "online");
        assert_eq!(online_badge(false, false), "offline");
    }

    #[test]
    fn plain_list_is_one_id_per_line() {
        let rendered = render_list(
            OutputFormat::Plain,
            &[1, 2, 3],
            |n| Row { n: *n },
            ToString::to_string,
        );
        assert_eq!(rendered.ok().as_deref(), Some("1\n2\n3"));
    }

    #[derive(Tabled)]
    struct Row {
        n: i32,
    }
}
