use crossterm::style::Stylize;
use eyre::{Result, WrapErr};

use crate::types::{ProbeResult, RunSummary, ScanOutcome};

const RESULT_SEPARATOR: &str = ", ";

/// One result line for an outcome, e.g. `web 10.0.0.1 PING, HTTP 200 nginx`.
pub fn format_outcome(outcome: &ScanOutcome, color: bool) -> String {
    match outcome {
        ScanOutcome::Scanned { target, address, results } => {
            let address = address.to_string();
            let results = results
                .iter()
                .map(|r| format_probe_result(r, color))
                .collect::<Vec<_>>()
                .join(RESULT_SEPARATOR);

            if color {
                format!("{} {} {}", target.as_str().blue(), address.as_str().yellow(), results)
            } else {
                format!("{} {} {}", target, address, results)
            }
        }
        ScanOutcome::Unresolved { target } => {
            if color {
                format!("{} {}", target.as_str().red(), "Failed to resolve".white())
            } else {
                format!("{} Failed to resolve", target)
            }
        }
    }
}

fn format_probe_result(result: &ProbeResult, color: bool) -> String {
    if result.detail.is_empty() {
        return if color {
            result.name.as_str().white().to_string()
        } else {
            result.name.clone()
        };
    }

    if !color {
        return format!("{} {}", result.name, result.detail);
    }

    // Leading token is the status code, anything after it is the server banner
    match result.detail.split_once(' ') {
        Some((code, banner)) => format!("{} {} {}", result.name.as_str().white(), code, banner.green()),
        None => format!("{} {}", result.name.as_str().white(), result.detail),
    }
}

pub fn format_json(outcome: &ScanOutcome) -> Result<String> {
    serde_json::to_string(outcome).wrap_err("Failed to serialize outcome")
}

pub fn format_progress(completed: usize, total: usize) -> String {
    format!("Progress: [{}/{}]", completed, total)
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Scan complete. {} of {} targets scanned, {} with findings, {} unresolved.",
        summary.completed, summary.total, summary.with_findings, summary.unresolved
    )
}
