//! Text and JSON renderings of a finished scan.

use rxscan_config::OutputFormat;
use rxscan_core::{Diagnostic, Group, Pattern, Presenter, ScanReport};
use serde::Serialize;
use std::fmt::Write as _;

pub const NO_MATCHES: &str = "No matched words found.";

/// Human-readable output: one block per `(pattern, url)` group.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPresenter;

impl TextPresenter {
    #[must_use]
    pub fn render_patterns(patterns: &[Pattern]) -> String {
        if patterns.is_empty() {
            return "No patterns saved. Add one with `rxscan add <PATTERN>`.\n".to_string();
        }
        let mut out = format!("Patterns ({}):\n", patterns.len());
        for (i, pattern) in patterns.iter().enumerate() {
            let _ = writeln!(out, "  {}. {pattern}", i + 1);
        }
        out
    }
}

impl Presenter for TextPresenter {
    fn render(&self, patterns: &[Pattern], report: &ScanReport) -> anyhow::Result<String> {
        let mut out = Self::render_patterns(patterns);
        out.push('\n');

        if report.is_empty() {
            let _ = writeln!(out, "{NO_MATCHES}");
        } else {
            for group in &report.groups {
                let _ = writeln!(out, "[{}] {}", group.pattern, group.url);
                for text in &group.matches {
                    let _ = writeln!(out, "    {text}");
                }
            }
        }

        let failed = report.failed_resources();
        let _ = writeln!(
            out,
            "\n{} matches in {} groups across {} resources",
            report.match_count(),
            report.groups.len(),
            report.urls.len()
        );
        if failed > 0 {
            let _ = writeln!(out, "{failed} resources failed to load");
        }
        for diagnostic in &report.diagnostics {
            let _ = writeln!(out, "  ! {diagnostic}");
        }

        Ok(out)
    }
}

/// Machine-readable output: a single JSON document per scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresenter;

#[derive(Serialize)]
struct JsonView<'a> {
    generation: u64,
    patterns: &'a [Pattern],
    urls: &'a [String],
    groups: &'a [Group],
    diagnostics: &'a [Diagnostic],
    raw_matches: usize,
}

impl Presenter for JsonPresenter {
    fn render(&self, patterns: &[Pattern], report: &ScanReport) -> anyhow::Result<String> {
        let view = JsonView {
            generation: report.generation.get(),
            patterns,
            urls: &report.urls,
            groups: &report.groups,
            diagnostics: &report.diagnostics,
            raw_matches: report.raw_matches,
        };
        Ok(serde_json::to_string_pretty(&view)? + "\n")
    }
}

#[must_use]
pub fn presenter_for(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Text => Box::new(TextPresenter),
        OutputFormat::Json => Box::new(JsonPresenter),
    }
}
