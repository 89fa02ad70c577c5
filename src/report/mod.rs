//! Report generation modules.
//!
//! Chart payload construction and report rendering.

pub mod chart;
pub mod generator;

pub use chart::{bar_chart, line_chart, ChartStyle};
pub use generator::{generate_chart_payload, generate_json_report, generate_markdown_report};
