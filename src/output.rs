use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};

use crate::report::Report;

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(|h| Cell::new(*h)));
    table
}

fn count_cell(n: u64) -> Cell {
    Cell::new(n).set_alignment(CellAlignment::Right)
}

pub fn endpoint_table(report: &Report) -> Table {
    let mut table = new_table(["Endpoint", "Call Count"]);
    for row in &report.endpoints {
        table.add_row(vec![Cell::new(&row.endpoint), count_cell(row.count)]);
    }
    table
}

pub fn per_minute_table(report: &Report) -> Table {
    let mut table = new_table(["Time", "Call Count"]);
    for row in &report.per_minute {
        table.add_row(vec![Cell::new(row.time), count_cell(row.count)]);
    }
    table
}

pub fn status_table(report: &Report) -> Table {
    let mut table = new_table(["Index", "Status Code", "Call Count"]);
    for row in &report.statuses {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(&row.status_code),
            count_cell(row.count),
        ]);
    }
    table
}

/// Endpoints, then calls per minute, then status codes.
pub fn print_tables(report: &Report) {
    println!("{}", endpoint_table(report));
    println!("{}", per_minute_table(report));
    println!("{}", status_table(report));
}

pub fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
