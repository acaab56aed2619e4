/// Console rendering: progress line, summary, unused-resource table.
///
/// Every function returns a `String` so the layout can be tested without a
/// terminal; the session decides where it is printed. Colors come from
/// `colored` and respect `NO_COLOR` / `CLICOLOR`.
use assetsleuth_core::report::AnalysisReport;
use assetsleuth_core::{Resource, SearchUnusedResourcesConfig};
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count using binary (1024) steps.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// The in-place progress line: `Found: F/T | Processed: P <- file`.
pub fn progress_line(found: usize, total: usize, processed: u64, current_file: &str) -> String {
    format!("Found: {found}/{total} | Processed: {processed} <- {current_file}")
}

/// Header describing the run about to start.
pub fn config_banner(
    command: &str,
    project_path: &Path,
    resources_path: &Path,
    config: &SearchUnusedResourcesConfig,
) -> String {
    let strategies: Vec<&str> = config.strategies.iter().map(|s| s.id()).collect();
    let excluded = config.excluded_paths.patterns();
    format!(
        "{}\nProject path: {}\nResources path: {}\nExcluded paths: [{}]\nStrategies: [{}]\nThreads: {}\n",
        format!("Run {command} with config:").bold(),
        project_path.display(),
        resources_path.display(),
        excluded.join(", "),
        strategies.join(", "),
        config.effective_threads(),
    )
}

/// Used resources with the files referencing them, then the totals.
pub fn summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Summary".bold());

    for used in &report.used_resources {
        let _ = writeln!(out, "\n{}", used.name.green());
        let last = used.found_in.len().saturating_sub(1);
        for (i, path) in used.found_in.iter().enumerate() {
            let branch = if i == last { "└──" } else { "├──" };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            let _ = writeln!(out, " {branch} {name}");
        }
    }

    out.push('\n');
    for (label, totals) in [
        ("Total resources", report.total),
        ("Used resources", report.used),
        ("Unused resources", report.unused),
    ] {
        let _ = writeln!(
            out,
            "{label}: {} / {} bytes ({})",
            totals.count,
            totals.bytes,
            format_size(totals.bytes)
        );
    }
    let _ = write!(
        out,
        "Total time: {}",
        format_duration(Duration::from_millis(report.elapsed_ms))
    );
    out
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{}m {:02}s", duration.as_secs() / 60, duration.as_secs() % 60)
    }
}

/// One table row: fixed cells on the first line, then one line per entry
/// of the last column.
struct Row {
    resource: String,
    size: String,
    lines: Vec<String>,
}

const HEADERS: [&str; 3] = ["Resource", "Size(bytes)", "Path"];

/// Box-drawn table of unused resources, sorted by name then path.
///
/// The path column holds the container path followed by the image files it
/// would take with it.
pub fn unused_table<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> String {
    let mut resources: Vec<&Resource> = resources.into_iter().collect();
    resources.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));

    let rows: Vec<Row> = resources
        .into_iter()
        .map(|r| {
            let mut lines = vec![r.path.display().to_string()];
            lines.extend(r.image_files.iter().map(|f| format!("  {}", f.name)));
            Row {
                resource: r.name.to_string(),
                size: r.size.to_string(),
                lines,
            }
        })
        .collect();
    draw_table(&rows)
}

fn draw_table(rows: &[Row]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        widths[0] = widths[0].max(row.resource.chars().count());
        widths[1] = widths[1].max(row.size.chars().count());
        for line in &row.lines {
            widths[2] = widths[2].max(line.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };
    let line = |cells: [&str; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("│ {} │", padded.join(" │ "))
    };

    let mut out = Vec::with_capacity(rows.len() * 3 + 4);
    out.push(rule("┌", "┬", "┐"));
    out.push(line(HEADERS));
    out.push(rule("├", "┼", "┤"));
    for (i, row) in rows.iter().enumerate() {
        for (j, path) in row.lines.iter().enumerate() {
            if j == 0 {
                out.push(line([row.resource.as_str(), row.size.as_str(), path.as_str()]));
            } else {
                out.push(line(["", "", path.as_str()]));
            }
        }
        if i + 1 < rows.len() {
            out.push(rule("├", "┼", "┤"));
        }
    }
    out.push(rule("└", "┴", "┘"));
    out.join("\n")
}
