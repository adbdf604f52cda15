use super::ui;
use crate::core::aggregate::HoldingValue;
use crate::core::category::Category;
use crate::core::currency::{self, Currency};
use crate::core::engine::PortfolioReport;
use comfy_table::Cell;

fn in_display_currency(holding: &HoldingValue, currency: Currency) -> (f64, f64) {
    match currency {
        Currency::TRY => (holding.value_try, holding.cost_try),
        Currency::USD => (holding.value_usd, holding.cost_usd),
    }
}

/// Holdings table followed by portfolio totals.
pub fn render(name: &str, report: &PortfolioReport, currency: Currency) -> String {
    let aggregate = &report.aggregate;

    let value_header = format!("Value ({currency})");
    let profit_header = format!("P/L ({currency})");
    let mut table = ui::new_table(&[
        "Investment",
        "Category",
        "Units",
        "Price",
        &value_header,
        &profit_header,
        "P/L (%)",
        "Daily",
    ]);

    for holding in &aggregate.holdings {
        let (value, cost) = in_display_currency(holding, currency);
        table.add_row(vec![
            Cell::new(&holding.instrument_id),
            Cell::new(holding.category.label()),
            Cell::new(format!("{:.4}", holding.amount)),
            ui::money_cell(holding.effective_price, holding.currency),
            ui::money_cell(value, currency),
            ui::money_cell(value - cost, currency),
            holding
                .profit_pct
                .map_or_else(ui::na_cell, ui::change_cell),
            holding
                .daily_change_percent
                .map_or_else(ui::na_cell, ui::change_cell),
        ]);
    }

    if aggregate.cash_try != 0.0 {
        let cash = currency::convert(aggregate.cash_try, Currency::TRY, currency, report.fx_rate);
        table.add_row(vec![
            Cell::new(ui::style_text("Cash", ui::StyleType::Subtle)),
            Cell::new(Category::Reserve.label()),
            Cell::new(""),
            Cell::new(""),
            ui::money_cell(cash, currency),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
        ]);
    }

    let (total, cost) = match currency {
        Currency::TRY => (aggregate.total_value_try, aggregate.total_cost_basis_try),
        Currency::USD => (aggregate.total_value_usd, aggregate.total_cost_basis_usd),
    };
    let profit = total - cost;
    let daily = currency::convert(
        aggregate.daily_profit_try,
        Currency::TRY,
        currency,
        report.fx_rate,
    );

    let mut output = format!(
        "Portfolio: {}\n\n",
        ui::style_text(name, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text(&format!("Total Value ({currency}):"), ui::StyleType::Label),
        ui::style_text(&format!("{total:.2}"), ui::StyleType::Total)
    ));
    let profit_text = match aggregate.profit_pct() {
        Some(pct) => format!("{profit:+.2} ({pct:+.2}%)"),
        None => format!("{profit:+.2}"),
    };
    output.push_str(&format!(
        "\n{} {}",
        ui::style_text("Profit/Loss:", ui::StyleType::Label),
        ui::signed_text(profit, &profit_text)
    ));
    output.push_str(&format!(
        "\n{} {}",
        ui::style_text("Daily Change:", ui::StyleType::Label),
        ui::signed_text(daily, &format!("{daily:+.2}"))
    ));

    if let (Some(best), Some(worst)) = (&aggregate.best_performer, &aggregate.worst_performer) {
        output.push_str(&format!(
            "\n{} {} ({:+.2}%)  {} {} ({:+.2}%)",
            ui::style_text("Best:", ui::StyleType::Label),
            best.instrument_id,
            best.profit_pct,
            ui::style_text("Worst:", ui::StyleType::Label),
            worst.instrument_id,
            worst.profit_pct
        ));
    }
    output.push_str(&ui::style_text(
        &format!("\nUSD/TRY: {:.4}", report.fx_rate.value()),
        ui::StyleType::Subtle,
    ));

    output
}

pub fn run(name: &str, report: &PortfolioReport, currency: Currency) {
    println!("{}", render(name, report, currency));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::FxRate;
    use crate::core::engine::{PortfolioInput, evaluate};
    use crate::core::holding::{AssetKind, CashItem, Holding};
    use crate::core::price::{PriceQuote, PriceSnapshot};

    fn report() -> PortfolioReport {
        let mut prices = PriceSnapshot::new();
        prices.insert(
            "THYAO.IS",
            PriceQuote {
                price: 15.0,
                daily_change_percent: 2.0,
            },
        );
        evaluate(&PortfolioInput {
            holdings: vec![
                Holding::new("THYAO.IS", AssetKind::Stock, Currency::TRY, 100.0, 10.0),
                Holding::new("NOPRICE.IS", AssetKind::Stock, Currency::TRY, 10.0, 5.0),
            ],
            cash: vec![CashItem::PlainCash {
                amount: 500.0,
                currency: Currency::TRY,
            }],
            prices,
            fx_rate: FxRate::new(30.0),
            history: vec![],
        })
    }

    #[test]
    fn test_summary_in_try() {
        let output = console::strip_ansi_codes(&render("Ana", &report(), Currency::TRY)).to_string();

        assert!(output.contains("Portfolio: Ana"));
        assert!(output.contains("THYAO.IS"));
        assert!(output.contains("Hisse (BIST)"));
        assert!(output.contains("1500.00 TRY"));
        assert!(output.contains("+50.00%"));
        assert!(output.contains("Yedek Akçe"));
        assert!(output.contains("Total Value (TRY): 2000.00"));
        assert!(output.contains("Daily Change: +30.00"));
        assert!(output.contains("N/A"));
    }

    #[test]
    fn test_summary_in_usd() {
        let output = console::strip_ansi_codes(&render("Ana", &report(), Currency::USD)).to_string();

        assert!(output.contains("Value (USD)"));
        assert!(output.contains("50.00 USD"));
        assert!(output.contains("Total Value (USD): 66.67"));
        assert!(output.contains("USD/TRY: 30.0000"));
    }
}
