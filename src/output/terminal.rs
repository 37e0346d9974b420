use crate::architecture::{AxisReport, EvaluationResult};
use crate::diagnostics::ReasonCode;
use colored::*;
use std::fmt::Write;

/// Render an architecture evaluation for a terminal.
pub fn render_evaluation(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.description.bold());
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "Dependency direction".bold());
    if result.dependency_violations.is_empty() {
        let _ = writeln!(out, "  {} core does not depend on shell", "✓".green());
    }
    for violation in &result.dependency_violations {
        let _ = writeln!(out, "  {} {}", "✗".red(), violation);
    }

    for axis in result.axes() {
        let _ = writeln!(out);
        render_axis(&mut out, axis);
    }

    let _ = writeln!(out);
    let count = result.violation_count();
    if count == 0 {
        let _ = writeln!(out, "{}", "No architecture violations".green().bold());
    } else {
        let _ = writeln!(
            out,
            "{}",
            format!("{} architecture violation(s)", count).red().bold()
        );
    }
    out
}

fn render_axis(out: &mut String, report: &AxisReport) {
    let summary = &report.summary;
    let status = if summary.converged {
        format!("converged in {} round(s)", summary.rounds)
    } else {
        format!("stopped after {} round(s)", summary.rounds).yellow().to_string()
    };
    let _ = writeln!(
        out,
        "{} ({}; {})",
        capitalize(report.axis).bold(),
        status,
        summary.counts.to_string().dimmed()
    );

    if report.violations.is_empty() {
        let _ = writeln!(out, "  {} every core unit passes", "✓".green());
    }
    for violation in &report.violations {
        let _ = writeln!(
            out,
            "  {} {} is {}",
            "✗".red(),
            violation.unit,
            violation.classification.red()
        );
        for diagnostic in report.diagnostics.iter().filter(|d| d.unit == violation.unit) {
            let _ = writeln!(out, "      {}: {}", diagnostic.reason, diagnostic.message);
        }
    }

    for unit in &report.unresolved {
        let _ = writeln!(out, "  {} {} is undecided", "?".yellow(), unit);
    }
    for diagnostic in report
        .diagnostics
        .iter()
        .filter(|d| d.reason == ReasonCode::NonConvergence)
    {
        let _ = writeln!(out, "  {} {}", "!".yellow(), diagnostic.message);
    }
}

/// One `<classification> <unit>` line per entry.
pub fn render_classifications<'a, I>(axis: &str, rows: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", capitalize(axis).bold());
    for (unit, classification) in rows {
        let _ = writeln!(out, "  {:<18} {}", classification, unit);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
