use crate::core::currency::Currency;
use crate::core::insight::InsightKind;
use crate::core::risk::RiskBand;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub enum StyleType {
    Title,
    Label,
    Total,
    Gain,
    Loss,
    Subtle,
}

pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Total => style(text).green().bold(),
        StyleType::Gain => style(text).green(),
        StyleType::Loss => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Green for zero or positive `value`, red otherwise.
pub fn signed_text(value: f64, text: &str) -> String {
    let style_type = if value >= 0.0 {
        StyleType::Gain
    } else {
        StyleType::Loss
    };
    style_text(text, style_type)
}

/// Rounded UTF-8 table with bold cyan headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| {
            Cell::new(h)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
    table
}

pub fn money(value: f64, currency: Currency) -> String {
    format!("{value:.2} {currency}")
}

pub fn money_cell(value: f64, currency: Currency) -> Cell {
    Cell::new(money(value, currency)).set_alignment(CellAlignment::Right)
}

pub fn share_cell(percent: f64, emphasized: bool) -> Cell {
    let cell = Cell::new(format!("{percent:.2}%")).set_alignment(CellAlignment::Right);
    if emphasized {
        cell.add_attribute(Attribute::Bold).fg(Color::Green)
    } else {
        cell
    }
}

/// Signed percentage, green for gains and red for losses.
pub fn change_cell(change: f64) -> Cell {
    let color = if change >= 0.0 { Color::Green } else { Color::Red };
    Cell::new(format!("{change:+.2}%"))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

pub fn insight_kind_cell(kind: InsightKind) -> Cell {
    let color = match kind {
        InsightKind::Critical => Color::Red,
        InsightKind::Warning => Color::Yellow,
        InsightKind::Suggestion => Color::Cyan,
        InsightKind::Info => Color::Blue,
        InsightKind::Success => Color::Green,
    };
    Cell::new(kind.to_string())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

pub fn risk_band_text(band: RiskBand) -> String {
    let text = style(band.to_string()).bold();
    match band {
        RiskBand::Low => text.green(),
        RiskBand::Medium => text.yellow(),
        RiskBand::High => text.red(),
    }
    .to_string()
}

/// Spinner and bar for concurrent quote fetching.
pub fn new_progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
