//! HTML report rendering.
//!
//! A pure projection of the forecast frame: an interactive chart overlaying
//! historical actuals, the point forecast and its shaded uncertainty band,
//! separate trend/seasonality component panels, and a table of the last
//! `horizon` rows. No computation happens here.

use std::fs;
use std::path::Path;

use plotly::color::{NamedColor, Rgba};
use plotly::common::{Fill, Line, Marker, Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};
use tracing::info;

use crate::core::ForecastFrame;
use crate::error::Result;
use crate::pipeline::RunConfig;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Render the full report as a standalone HTML document.
pub fn render_html(frame: &ForecastFrame, config: &RunConfig) -> String {
    let forecast = forecast_chart(frame, config).to_inline_html(Some("forecast-chart"));
    let trend = trend_chart(frame).to_inline_html(Some("trend-chart"));
    let seasonal = seasonal_chart(frame).to_inline_html(Some("seasonal-chart"));
    let table = table_html(frame);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Forecast: {label}</title>
<script src="{cdn}"></script>
<style>
body {{ font-family: sans-serif; margin: 2rem auto; max-width: 1100px; color: #222; }}
h1, h2 {{ font-weight: 600; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ddd; padding: 0.4rem 0.8rem; text-align: right; }}
th {{ background: #f5f5f5; }}
td:first-child, th:first-child {{ text-align: left; }}
</style>
</head>
<body>
<h1>Forecast: {label}</h1>
<p>{history} historical buckets at {frequency} frequency, {horizon} forecast buckets,
{coverage:.0}% uncertainty band.</p>
<h2>Forecast</h2>
{forecast}
<h2>Components</h2>
{trend}
{seasonal}
<h2>Forecast data (last {horizon} buckets)</h2>
{table}
</body>
</html>
"#,
        label = escape(&config.value_column),
        cdn = PLOTLY_CDN,
        history = frame.history_len(),
        frequency = config.frequency,
        horizon = frame.horizon(),
        coverage = config.confidence * 100.0,
        forecast = forecast,
        trend = trend,
        seasonal = seasonal,
        table = table,
    )
}

/// Render and write the report to disk.
pub fn write_html<P: AsRef<Path>>(frame: &ForecastFrame, config: &RunConfig, path: P) -> Result<()> {
    let html = render_html(frame, config);
    fs::write(path.as_ref(), html)?;
    info!(path = %path.as_ref().display(), "wrote report");
    Ok(())
}

fn date_labels(frame: &ForecastFrame) -> Vec<String> {
    frame.dates().iter().map(|d| d.to_string()).collect()
}

/// Historical actuals, point forecast, and shaded uncertainty band.
fn forecast_chart(frame: &ForecastFrame, config: &RunConfig) -> Plot {
    let dates = date_labels(frame);
    let history_dates = dates[..frame.history_len()].to_vec();

    let lower = Scatter::new(
        dates.clone(),
        frame.rows().iter().map(|r| r.lower).collect::<Vec<f64>>(),
    )
    .mode(Mode::Lines)
    .line(Line::new().width(0.0).color(NamedColor::SteelBlue))
    .show_legend(false)
    .name("lower");

    let upper = Scatter::new(
        dates.clone(),
        frame.rows().iter().map(|r| r.upper).collect::<Vec<f64>>(),
    )
    .mode(Mode::Lines)
    .line(Line::new().width(0.0).color(NamedColor::SteelBlue))
    .fill(Fill::ToNextY)
    .fill_color(Rgba::new(70, 130, 180, 0.25))
    .name("uncertainty band");

    let point = Scatter::new(
        dates,
        frame.rows().iter().map(|r| r.point).collect::<Vec<f64>>(),
    )
    .mode(Mode::Lines)
    .line(Line::new().color(NamedColor::SteelBlue))
    .name("forecast");

    let actuals = Scatter::new(history_dates, frame.actuals().to_vec())
        .mode(Mode::Markers)
        .marker(Marker::new().size(4).color(NamedColor::Black))
        .name("observed");

    let mut plot = Plot::new();
    plot.add_trace(lower);
    plot.add_trace(upper);
    plot.add_trace(point);
    plot.add_trace(actuals);
    plot.set_layout(
        Layout::new()
            .title(Title::with_text("Forecasted values with uncertainty band"))
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text(config.value_column.clone())))
            .height(450),
    );
    plot
}

fn trend_chart(frame: &ForecastFrame) -> Plot {
    let trace = Scatter::new(date_labels(frame), frame.trend().to_vec())
        .mode(Mode::Lines)
        .line(Line::new().color(NamedColor::DarkOrange))
        .name("trend");

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(Title::with_text("Trend component"))
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .height(300),
    );
    plot
}

fn seasonal_chart(frame: &ForecastFrame) -> Plot {
    let trace = Scatter::new(date_labels(frame), frame.seasonal().to_vec())
        .mode(Mode::Lines)
        .line(Line::new().color(NamedColor::SeaGreen))
        .name("seasonality");

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(Title::with_text("Seasonal component"))
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .height(300),
    );
    plot
}

/// The tail-window data table: last `horizon` rows of the frame.
fn table_html(frame: &ForecastFrame) -> String {
    let mut out = String::from(
        "<table>\n<tr><th>date</th><th>point</th><th>lower</th><th>upper</th></tr>\n",
    );
    for row in frame.tail(frame.horizon()) {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
            row.date, row.point, row.lower, row.upper
        ));
    }
    out.push_str("</table>");
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ForecastFrame, ForecastRow};
    use chrono::NaiveDate;

    fn make_frame(history: usize, horizon: usize) -> ForecastFrame {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let total = history + horizon;
        let rows: Vec<ForecastRow> = (0..total)
            .map(|t| ForecastRow {
                date: base + chrono::Duration::days(t as i64),
                point: t as f64,
                lower: t as f64 - 1.0,
                upper: t as f64 + 1.0,
            })
            .collect();
        let actuals: Vec<f64> = (0..history).map(|t| t as f64 + 0.1).collect();
        ForecastFrame::new(rows, vec![0.0; total], vec![0.0; total], actuals).unwrap()
    }

    fn make_config() -> RunConfig {
        RunConfig::new("date", "sales")
    }

    #[test]
    fn report_contains_all_three_charts_and_the_table() {
        let frame = make_frame(10, 5);
        let html = render_html(&frame, &make_config());

        assert!(html.contains("forecast-chart"));
        assert!(html.contains("trend-chart"));
        assert!(html.contains("seasonal-chart"));
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn table_shows_exactly_horizon_rows() {
        let frame = make_frame(10, 5);
        let table = table_html(&frame);
        // Header row plus one row per forecast bucket.
        assert_eq!(table.matches("<tr>").count(), 6);
        // First data row is the first future bucket.
        assert!(table.contains("2024-01-11"));
    }

    #[test]
    fn value_label_is_escaped() {
        let frame = make_frame(5, 2);
        let mut config = make_config();
        config.value_column = "a<b&c".to_string();
        let html = render_html(&frame, &config);
        assert!(html.contains("a&lt;b&amp;c"));
        assert!(!html.contains("<title>Forecast: a<b&c"));
    }

    #[test]
    fn write_html_creates_the_file() {
        let frame = make_frame(8, 3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html(&frame, &make_config(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
