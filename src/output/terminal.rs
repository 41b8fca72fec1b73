//! End-of-run report on stdout.

use crate::processing::SkippedRow;
use crate::routes::RouteReport;
use colored::Colorize;
use itertools::Itertools;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

pub fn skipped_lines(skipped: &[SkippedRow]) -> Vec<String> {
    skipped
        .iter()
        .map(|s| format!("row {}: {}", format_field(s.row, 6), s.reason))
        .collect()
}

pub fn unresolved_line(hostnames: &[&str]) -> Option<String> {
    if hostnames.is_empty() {
        return None;
    }
    Some(format!(
        "No coordinates for {} device(s): {}",
        hostnames.len(),
        hostnames.iter().join(", ")
    ))
}

pub fn route_lines(report: &RouteReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.new_routes.is_empty() {
        lines.push("No new routes to add".to_string());
    } else {
        lines.push(format!("{} new route(s) to add:", report.new_routes.len()));
        lines.extend(report.new_routes.iter().map(|r| format!("  {r}")));
    }
    lines.push(format!(
        "Route ledger now holds {} route(s)",
        report.full_routes.len()
    ));
    lines
}

pub fn print_skipped(skipped: &[SkippedRow]) {
    if skipped.is_empty() {
        return;
    }
    println!("{}", format!("Skipped {} row(s):", skipped.len()).yellow());
    for line in skipped_lines(skipped) {
        println!("  {}", line.yellow());
    }
}

pub fn print_unresolved(hostnames: &[&str]) {
    if let Some(line) = unresolved_line(hostnames) {
        println!("{}", line.red());
    }
}

pub fn print_route_report(report: &RouteReport) {
    for line in route_lines(report) {
        if report.new_routes.is_empty() {
            println!("{line}");
        } else {
            println!("{}", line.green());
        }
    }
}
