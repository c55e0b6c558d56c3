pub mod chart;
pub mod report;

pub use chart::BarChart;
pub use report::{currency_label, render_report, result_lines};
