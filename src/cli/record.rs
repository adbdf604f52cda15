use super::ui;
use crate::core::engine::PortfolioReport;
use crate::core::trend::HistoryPoint;
use crate::store::HistoryStore;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Appends today's totals to the value history.
pub fn run(store: &HistoryStore, report: &PortfolioReport, now: DateTime<Utc>) -> Result<HistoryPoint> {
    let point = HistoryPoint {
        timestamp: now,
        value_try: report.aggregate.total_value_try,
        value_usd: report.aggregate.total_value_usd,
    };
    let sequence = store.append(&point)?;
    tracing::info!(sequence, "Recorded portfolio value");

    println!(
        "{} {:.2} TRY / {:.2} USD {}",
        ui::style_text("Recorded:", ui::StyleType::Label),
        point.value_try,
        point.value_usd,
        ui::style_text(&format!("(#{})", sequence + 1), ui::StyleType::Subtle)
    );
    Ok(point)
}
