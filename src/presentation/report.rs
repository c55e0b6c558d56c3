use crate::models::pricing::{RateSource, SimulationReport};
use crate::utils::money::{format_amount, format_currency};

/// Display label for a currency code, e.g. `VES` is shown as `Bs`.
pub fn currency_label(code: &str) -> &str {
    match code {
        "VES" | "VEF" => "Bs",
        _ => code,
    }
}

pub fn rate_header(report: &SimulationReport) -> Option<String> {
    report.live_rate.map(|rate| {
        format!(
            "Daily Actual Exchange Rate ({} to {}): {}",
            report.base_currency,
            report.quote_currency,
            format_currency(rate)
        )
    })
}

fn source_label(source: RateSource) -> &'static str {
    match source {
        RateSource::Manual => "manual",
        RateSource::Live => "live",
        RateSource::Fallback => "fallback, live rate unavailable",
    }
}

/// Result lines for both scenarios, in the order they are displayed.
pub fn result_lines(report: &SimulationReport) -> Vec<String> {
    let local = currency_label(&report.quote_currency);
    let foreign = report.base_currency.as_str();
    let mut lines = Vec::with_capacity(4);

    for scenario in report.scenarios() {
        let label = scenario.kind.label();
        lines.push(format!(
            "{} Cost p/g: {} ({})",
            label,
            format_amount(scenario.result.cost_local, local),
            format_amount(report.cost_per_unit, foreign)
        ));
        lines.push(format!(
            "{} Price p/g: {} ({})",
            label,
            format_amount(scenario.result.sale_price_local, local),
            format_amount(scenario.result.sale_price_foreign, foreign)
        ));
    }

    lines
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

pub fn render_report(report: &SimulationReport) -> String {
    let local = currency_label(&report.quote_currency);
    let mut out = String::new();

    if let Some(header) = rate_header(report) {
        out.push_str(&header);
        out.push('\n');
    }

    out.push_str(&format!(
        "Actual Exchange Rate: {} {}/{} ({})\n",
        format_currency(report.actual.exchange_rate),
        local,
        report.base_currency,
        source_label(report.rate_source)
    ));
    out.push_str(&format!(
        "New Exchange Rate: {} {}/{}\n",
        format_currency(report.new.exchange_rate),
        local,
        report.base_currency
    ));
    out.push_str(&format!("Target Margin: {}%\n\n", format_currency(report.margin * 100.0)));

    for line in result_lines(report) {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&format!(
        "\nCost change: {} {}\nPrice change: {} {}\n",
        signed(report.cost_change_local()),
        local,
        signed(report.sale_price_change_local()),
        local
    ));

    out
}
