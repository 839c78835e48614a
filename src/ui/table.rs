use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

use crate::metrics::duration::EMPTY_CELL;
use crate::metrics::report::Report;
use crate::ui::theme;

/// Columns holding durations rather than counts.
const DURATION_COLUMNS: [usize; 4] = [5, 8, 9, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
}

impl OutputFormat {
    pub fn from_csv_flag(csv: bool) -> Self {
        if csv { Self::Csv } else { Self::Table }
    }
}

pub fn render(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::Csv => render_csv(report),
    }
}

/// Bordered terminal table. Colours are only emitted on a TTY.
pub fn render_table(report: &Report) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(
            report
                .headers
                .iter()
                .map(|h| Cell::new(h).fg(theme::HEADER).add_attribute(Attribute::Bold)),
        );

    for row in &report.rows {
        table.add_row(row.cells().iter().enumerate().map(|(i, value)| {
            let cell = Cell::new(value);
            if value == EMPTY_CELL {
                cell.fg(theme::EMPTY)
            } else if i == 0 {
                cell.fg(theme::PR_NUMBER)
            } else if DURATION_COLUMNS.contains(&i) {
                cell.fg(theme::DURATION)
            } else {
                cell
            }
        }));
    }

    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table.to_string()
}

/// Header line followed by one line per row, each newline-terminated.
pub fn render_csv(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&csv_line(report.headers.iter()));
    for row in &report.rows {
        out.push_str(&csv_line(row.cells().iter()));
    }
    out
}

fn csv_line<'a>(fields: impl Iterator<Item = &'a String>) -> String {
    let mut line = fields.map(|f| csv_field(f)).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
