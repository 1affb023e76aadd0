//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use clientele_core::{Notice, NoticeLevel};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled on stderr, where
/// notices go.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// `plain` calls `id_fn` on each item to emit one identifier per line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
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

/// Print a notice to stderr: a colored title line, then its detail.
pub fn print_notice(notice: &Notice, color: bool, quiet: bool) {
    // Errors are surfaced through `CliError`; everything else obeys --quiet.
    if quiet && notice.level != NoticeLevel::Error {
        return;
    }
    let title = if color {
        match notice.level {
            NoticeLevel::Info => notice.title.cyan().to_string(),
            NoticeLevel::Success => notice.title.green().to_string(),
            NoticeLevel::Warning => notice.title.yellow().to_string(),
            NoticeLevel::Error => notice.title.red().bold().to_string(),
        }
    } else {
        notice.title.clone()
    };
    let mut stderr = io::stderr().lock();
    match notice.detail {
        Some(ref detail) => {
            let _ = writeln!(stderr, "{title} {detail}");
        }
        None => {
            let _ = writeln!(stderr, "{title}");
        }
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        name: String,
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let data = vec![
            Row { name: "a".into() },
            Row { name: "b".into() },
        ];
        let out = render_list(&OutputFormat::Plain, &data, |r| Row { name: r.name.clone() }, |r| r.name.clone());
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn compact_json_is_single_line() {
        let data = vec![Row { name: "a".into() }];
        let out = render_list(&OutputFormat::JsonCompact, &data, |r| Row { name: r.name.clone() }, |r| r.name.clone());
        assert_eq!(out, r#"[{"name":"a"}]"#);
    }
}
