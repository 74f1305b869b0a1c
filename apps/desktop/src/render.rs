//! Plain-text rendering of complaint rows for the terminal.

use shared::domain::Complaint;

/// Submission timestamps are shown to the minute.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const HEADERS: [&str; 5] = ["ID", "Name", "Gender", "Comment", "Date"];

pub const ABOUT: &str = "Complaint Desk\n\
Record, search and delete short complaints kept in a local SQLite database.";

pub fn render_table(rows: &[Complaint]) -> String {
    if rows.is_empty() {
        return "No complaints found.\n".to_string();
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.name.clone(),
                row.gender.to_string(),
                row.comment.replace(['\n', '\r'], " "),
                row.submitted.format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    push_line(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_summary(shown: usize, total: i64, search: Option<&str>) -> String {
    let noun = if total == 1 { "complaint" } else { "complaints" };
    match search.filter(|s| !s.is_empty()) {
        Some(search) => {
            let verb = if shown == 1 { "matches" } else { "match" };
            format!("{shown} of {total} {noun} {verb} '{search}'.")
        }
        None => format!("{total} {noun}."),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
