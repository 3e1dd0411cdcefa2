use std::fmt::Write as _;

use neobench_core::{LatencySummary, ProgressReport, RunResult, ScriptResult};

use super::format::{display_database, format_percent};

pub(crate) fn start_banner(database_name: &str, url: &str, scenario: &str) -> String {
    format!(
        "Starting workload on database {} against {url}\nScenario: {scenario}\n",
        display_database(database_name)
    )
}

pub(crate) fn init_progress_line(report: &ProgressReport) -> String {
    format!(
        "[{}][{}] {}%\n",
        report.section,
        report.step,
        format_percent(report.completeness)
    )
}

pub(crate) fn error_line(args: std::fmt::Arguments<'_>) -> String {
    format!("ERROR: {args}\n")
}

fn write_totals_line(out: &mut String, indent: &str, succeeded: u64, failed: u64, rate: f64) {
    writeln!(
        out,
        "{indent}{succeeded} successful transactions, {failed} failed. (Total of {rate:.3} per second)"
    )
    .ok();
}

fn write_header(result: &RunResult, out: &mut String) {
    out.push_str("== Results ==\n");
    writeln!(out, "Scenario: {}", result.scenario).ok();
    write_totals_line(
        out,
        "",
        result.total_succeeded(),
        result.total_failed(),
        result.total_rate(),
    );
}

pub(crate) fn render_throughput(result: &RunResult) -> String {
    let mut out = String::new();
    write_header(result, &mut out);

    out.push('\n');
    for script in result.scripts.values() {
        writeln!(
            out,
            "  [{}]: {:.3} total transactions per second",
            script.script_name, script.rate
        )
        .ok();
    }
    out.push('\n');
    write_error_report(result, &mut out);

    out
}

pub(crate) fn render_latency(result: &RunResult) -> String {
    let mut out = String::new();
    write_header(result, &mut out);

    if result.total_succeeded() > 0 {
        for script in result.scripts.values() {
            out.push('\n');
            writeln!(out, "-- Script: {} --\n", script.script_name).ok();
            write_script_latency(script, &mut out, "  ");
        }
    }
    out.push('\n');
    write_error_report(result, &mut out);

    out
}

fn write_script_latency(script: &ScriptResult, out: &mut String, indent: &str) {
    let h = LatencySummary::of(&script.latencies);

    write_totals_line(out, indent, script.succeeded, script.failed, script.rate);
    writeln!(
        out,
        "{indent}Max: {:.3}ms, Min: {:.3}ms, Mean: {:.3}ms, Stddev: {:.3}\n",
        h.max, h.min, h.mean, h.stdev
    )
    .ok();
    writeln!(out, "{indent}Latency distribution:").ok();
    for (label, value) in h.ladder() {
        writeln!(out, "{indent}  {label}: {value:.3}ms").ok();
    }
}

pub(crate) fn write_error_report(result: &RunResult, out: &mut String) {
    out.push_str("Error stats:\n");

    let failed = result.total_failed();
    if failed == 0 {
        out.push_str("  No errors!\n");
        return;
    }

    writeln!(
        out,
        "  Failed transactions: {failed} ({:.3} %)",
        result.failure_percentage()
    )
    .ok();
    out.push('\n');
    out.push_str("  Causes:\n");
    for (name, group) in &result.failed_by_error_group {
        writeln!(out, "    {name}: {} failures", group.count).ok();
        writeln!(out, "      (ex: {})", group.first_failure).ok();
    }
}
