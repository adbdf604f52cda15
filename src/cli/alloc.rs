use super::ui;
use crate::core::aggregate::HoldingValue;
use crate::core::category::Category;
use crate::core::currency::{self, Currency};
use crate::core::engine::PortfolioReport;
use comfy_table::Cell;
use std::collections::BTreeMap;

/// Category breakdown with the holdings of each category nested below it.
pub fn render(name: &str, report: &PortfolioReport, currency: Currency) -> String {
    let aggregate = &report.aggregate;
    let total = aggregate.total_value_try;
    let share = |value_try: f64| {
        if total > 0.0 {
            value_try / total * 100.0
        } else {
            0.0
        }
    };
    let display = |value_try: f64| {
        ui::money_cell(
            currency::convert(value_try, Currency::TRY, currency, report.fx_rate),
            currency,
        )
    };

    let mut members: BTreeMap<&Category, Vec<&HoldingValue>> = BTreeMap::new();
    for holding in &aggregate.holdings {
        members.entry(&holding.category).or_default().push(holding);
    }

    // Largest category first
    let mut categories: Vec<(&Category, f64)> = aggregate
        .category_values
        .iter()
        .map(|(category, value)| (category, *value))
        .collect();
    categories.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    let value_header = format!("Value ({currency})");
    let mut table = ui::new_table(&["Category", "Investment", &value_header, "Allocation"]);

    for (category, value_try) in categories {
        table.add_row(vec![
            Cell::new(category.label()),
            Cell::new(""),
            display(value_try),
            ui::share_cell(share(value_try), true),
        ]);

        let mut holdings = members.remove(category).unwrap_or_default();
        holdings.sort_by(|a, b| b.value_try.total_cmp(&a.value_try));
        for holding in holdings {
            table.add_row(vec![
                Cell::new(""),
                Cell::new(ui::style_text(&holding.instrument_id, ui::StyleType::Subtle)),
                display(holding.value_try),
                ui::share_cell(share(holding.value_try), false),
            ]);
        }
    }

    let mut output = format!(
        "Allocation: {}\n\n",
        ui::style_text(name, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text("Categories:", ui::StyleType::Label),
        aggregate.category_count()
    ));
    output
}

pub fn run(name: &str, report: &PortfolioReport, currency: Currency) {
    println!("{}", render(name, report, currency));
    ui::print_separator();
}
