//! Elastic terminal tables for the report sections.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Render an aligned table. `aligns` pairs with columns; missing entries
/// default to left alignment (numeric columns pass `Align::Right`).
pub fn render_table(headers: &[&str], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}",
        format_row(
            &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
            &widths,
            aligns
        )
    );
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(3))).collect();
    let _ = writeln!(output, "{}", separator.join("  "));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, aligns));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>], aligns: &[Align]) {
    print!("{}", render_table(headers, rows, aligns));
}

fn format_row(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut rendered = Vec::with_capacity(cells.len());
    for (idx, cell) in cells.iter().enumerate() {
        let Some(width) = widths.get(idx).copied() else {
            break;
        };
        let align = aligns.get(idx).copied().unwrap_or(Align::Left);
        let padding = width.saturating_sub(cell.chars().count());
        let padded = match align {
            Align::Left => format!("{cell}{}", " ".repeat(padding)),
            Align::Right => format!("{}{cell}", " ".repeat(padding)),
        };
        rendered.push(padded);
    }
    let mut line = rendered.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}
