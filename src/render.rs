//! Plain-text table rendering for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Decimal places kept for fractional numbers on screen.
const DISPLAY_DECIMALS: usize = 4;

/// Renders `rows` under `headers`; columns whose cells all look numeric are
/// right-aligned. Numbers with more than four decimals are rounded for display
/// only; CSV output keeps the full value.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| round_decimals(cell)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let rows = rows.as_slice();
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    let mut aligns = vec![Align::Right; column_count];

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
            if !cell.is_empty() && !looks_numeric(cell) {
                aligns[idx] = Align::Left;
            }
        }
    }
    if rows.is_empty() {
        aligns.fill(Align::Left);
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, &aligns));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &aligns));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &aligns));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let cells = values
        .iter()
        .zip(widths.iter().zip(aligns))
        .map(|(value, (&width, &align))| {
            let cell = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&cell)));
            match align {
                Align::Left => format!("{cell}{padding}"),
                Align::Right => format!("{padding}{cell}"),
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn round_decimals(value: &str) -> String {
    let long_fraction = value
        .split_once('.')
        .is_some_and(|(_, fraction)| fraction.len() > DISPLAY_DECIMALS);
    match value.parse::<f64>() {
        Ok(number) if long_fraction && number.is_finite() => {
            format!("{number:.prec$}", prec = DISPLAY_DECIMALS)
        }
        _ => value.to_string(),
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim_end_matches('%');
    trimmed.parse::<f64>().is_ok()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn numeric_columns_align_right() {
        let rendered = render_table(
            &strings(&["tag", "count"]),
            &[strings(&["funny", "2"]), strings(&["cute", "15"])],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "tag    count");
        assert_eq!(lines[1], "-----  -----");
        assert_eq!(lines[2], "funny      2");
        assert_eq!(lines[3], "cute      15");
    }

    #[test]
    fn long_fractions_are_rounded_on_screen() {
        let rendered = render_table(
            &strings(&["name", "score"]),
            &[
                strings(&["a", "0.123456789"]),
                strings(&["b", "1.5"]),
                strings(&["c", "v1.23456"]),
            ],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[2], "a     0.1235");
        assert_eq!(lines[3], "b     1.5");
        assert_eq!(lines[4], "c     v1.23456");
    }

    #[test]
    fn control_characters_become_spaces() {
        let rendered = render_table(&strings(&["title"]), &[strings(&["a\nb\tc"])]);
        assert_eq!(rendered.lines().nth(2), Some("a b c"));
    }
}
