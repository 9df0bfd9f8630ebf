//! Terminal rendering for quotes, conversions and status.

use crate::core::RateQuote;
use crate::service::{ConversionResult, StatusSnapshot};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Dim for healthy sources, red when the quote is degraded.
fn source_label(quote_source: crate::core::RateSource) -> String {
    let text = quote_source.to_string();
    if quote_source.is_degraded() {
        style(text).red().to_string()
    } else {
        style(text).dim().to_string()
    }
}

pub fn render_rate(quote: &RateQuote) -> String {
    format!(
        "1 BTC = {} ZEC ({})",
        style(format!("{:.8}", quote.rate)).green().bold(),
        source_label(quote.source)
    )
}

pub fn render_conversion(result: &ConversionResult) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("BTC"),
        header_cell("Rate (ZEC/BTC)"),
        header_cell("ZEC"),
    ]);
    table.add_row(vec![
        amount_cell(format!("{:.8}", result.btc_amount)),
        amount_cell(format!("{:.8}", result.exchange_rate)),
        amount_cell(format!("{:.8}", result.zec_amount)),
    ]);

    format!(
        "{}\n\nSource: {}  Quoted at: {}\n{}",
        table,
        source_label(result.source),
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        style(result.note).dim()
    )
}

pub fn render_status(status: &StatusSnapshot) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    table.add_row(vec![
        Cell::new("Enabled"),
        Cell::new(status.enabled.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Provider"),
        Cell::new(status.provider.to_string()),
    ]);
    table.add_row(vec![Cell::new("Mode"), Cell::new(status.mode)]);
    table.add_row(vec![
        Cell::new("Cached entries"),
        Cell::new(status.cached_entries.to_string()),
    ]);
    table.to_string()
}
