//! Bordered text table for the all-regions report.

use rollout_common::RegionReport;

const HEADERS: [&str; 7] = [
    "Region",
    "Total",
    "Success",
    "Failed",
    "Unmanaged",
    "Pending",
    "Uninstalled",
];

fn with_percent(report: &RegionReport, count: usize) -> String {
    format!("{count} ({}%)", report.percent_of(count))
}

fn row(report: &RegionReport) -> [String; 7] {
    [
        report.region.clone(),
        report.total.to_string(),
        with_percent(report, report.success),
        with_percent(report, report.failed),
        with_percent(report, report.unmanaged),
        with_percent(report, report.pending),
        with_percent(report, report.uninstalled),
    ]
}

fn border(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    line
}

fn line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, w) in cells.iter().zip(widths) {
        out.push_str(&format!(" {:^w$} |", cell.as_ref()));
    }
    out
}

/// Render reports as a centered, bordered table with one row per region.
///
/// Count columns show `N (P%)` where `P = N * 100 / max(total, 1)`.
#[must_use]
pub fn render_report_table(reports: &[RegionReport]) -> String {
    let rows: Vec<[String; 7]> = reports.iter().map(row).collect();
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = border(&widths);
    let mut out = vec![rule.clone(), line(&HEADERS, &widths), rule.clone()];
    out.extend(rows.iter().map(|r| line(r, &widths)));
    out.push(rule);
    out.join("\n")
}
