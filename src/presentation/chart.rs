use crate::models::pricing::SimulationReport;
use crate::utils::money::format_currency;
use serde::Serialize;

pub const COST_COLOR: &str = "#216AE8";
pub const SALE_PRICE_COLOR: &str = "#F0FDA8";
pub const DEFAULT_TEXT_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Grouped bar chart comparing cost and sale price per scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bar_mode: String,
    pub height: u32,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    pub fn from_report(report: &SimulationReport, local_label: &str) -> Self {
        let scenarios = report.scenarios();

        Self {
            title: "Cost and Price Comparison".to_string(),
            x_title: "State".to_string(),
            y_title: format!("Amounts ({})", local_label),
            bar_mode: "group".to_string(),
            height: 400,
            categories: scenarios.iter().map(|s| s.kind.label().to_string()).collect(),
            series: vec![
                BarSeries {
                    name: format!("Cost ({})", local_label),
                    color: COST_COLOR.to_string(),
                    values: scenarios.iter().map(|s| s.result.cost_local).collect(),
                },
                BarSeries {
                    name: format!("Sales Price ({})", local_label),
                    color: SALE_PRICE_COLOR.to_string(),
                    values: scenarios.iter().map(|s| s.result.sale_price_local).collect(),
                },
            ],
        }
    }

    fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    /// Renders the chart as fixed-width text, one group per category.
    pub fn render_text(&self, width: usize) -> String {
        let max = self.max_value();
        let label_width = self.series.iter().map(|s| s.name.len()).max().unwrap_or(0);

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        for (idx, category) in self.categories.iter().enumerate() {
            out.push_str(category);
            out.push('\n');

            for series in &self.series {
                let value = series.values.get(idx).copied().unwrap_or(0.0);
                let filled = if max > 0.0 && value > 0.0 {
                    ((value / max) * width as f64).round() as usize
                } else {
                    0
                };
                let filled = filled.min(width);

                out.push_str(&format!(
                    "  {:<label_width$} |{}{}| {}\n",
                    series.name,
                    "#".repeat(filled),
                    " ".repeat(width - filled),
                    format_currency(value),
                    label_width = label_width,
                ));
            }
        }

        out
    }
}
