use super::ui;
use crate::core::engine::PortfolioReport;
use comfy_table::Cell;

/// Risk score, weekly trend and the generated insight list.
pub fn render(name: &str, report: &PortfolioReport) -> String {
    let risk = &report.risk;
    let ratios = &report.ratios;

    let mut output = format!(
        "Insights: {}\n\n",
        ui::style_text(name, ui::StyleType::Title)
    );
    output.push_str(&format!(
        "{} {}/10 ({})\n",
        ui::style_text("Risk:", ui::StyleType::Label),
        risk.score,
        ui::risk_band_text(risk.band())
    ));
    output.push_str(&format!(
        "{} {}/10\n",
        ui::style_text("Diversification:", ui::StyleType::Label),
        risk.diversification
    ));
    output.push_str(&ui::style_text(
        &format!(
            "Crypto {:.1}%  Stocks {:.1}%  Gold {:.1}%  Cash {:.1}%\n",
            ratios.crypto * 100.0,
            ratios.stock * 100.0,
            ratios.gold * 100.0,
            ratios.cash * 100.0
        ),
        ui::StyleType::Subtle,
    ));

    let trend = match report.trend {
        Some(signal) => ui::signed_text(
            signal.change_pct(),
            &format!("{:+.2}% this week", signal.change_pct()),
        ),
        None => ui::style_text("no signal", ui::StyleType::Subtle),
    };
    output.push_str(&format!(
        "{} {}\n\n",
        ui::style_text("Trend:", ui::StyleType::Label),
        trend
    ));

    if report.insights.is_empty() {
        output.push_str("No insights for this portfolio.");
        return output;
    }

    let mut insights: Vec<_> = report.insights.iter().collect();
    // Stable: equal priorities keep rule order.
    insights.sort_by_key(|i| i.priority);

    let mut table = ui::new_table(&["Kind", "Insight", "Details"]);
    for insight in insights {
        table.add_row(vec![
            ui::insight_kind_cell(insight.kind),
            Cell::new(&insight.title),
            Cell::new(&insight.message),
        ]);
    }
    output.push_str(&table.to_string());
    output
}

pub fn run(name: &str, report: &PortfolioReport) {
    println!("{}", render(name, report));
}
