//! Server-side SVG rendering of the two report figures.
//!
//! Plain polyline charts built as SVG strings: a four-panel decomposition
//! figure and a combined history-plus-forecast figure. Gaps (NaN values at
//! the decomposition edges) break the line instead of drawing through.

use crate::core::{ForecastTable, MonthlySeries};
use crate::decompose::Decomposition;

const FIG_WIDTH: f64 = 560.0;
const PANEL_HEIGHT: f64 = 110.0;
const MARGIN_LEFT: f64 = 58.0;
const MARGIN_RIGHT: f64 = 14.0;
const MARGIN_TOP: f64 = 22.0;
const MARGIN_BOTTOM: f64 = 26.0;

const HISTORY_COLOR: &str = "#1f77b4";
const FORECAST_COLOR: &str = "#d62728";

/// One panel's drawing area inside the figure.
struct Panel {
    top: f64,
    height: f64,
}

impl Panel {
    /// Map `(index, value)` into SVG coordinates for this panel.
    fn project(&self, i: usize, value: f64, x_max: usize, lo: f64, hi: f64) -> (f64, f64) {
        let span = (x_max.max(1)) as f64;
        let x = MARGIN_LEFT + (FIG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT) * i as f64 / span;
        let y = self.top + self.height * (1.0 - (value - lo) / (hi - lo));
        (x, y)
    }
}

/// Value range over the finite entries of several slices, padded so a flat
/// series still has a visible band.
fn value_range(slices: &[&[f64]]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for slice in slices {
        for &v in *slice {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-12 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.04 * (hi - lo);
    (lo - pad, hi + pad)
}

/// SVG path for a series inside a panel; NaN entries restart the path.
fn series_path(
    values: &[f64],
    offset: usize,
    panel: &Panel,
    x_max: usize,
    lo: f64,
    hi: f64,
) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            pen_down = false;
            continue;
        }
        let (x, y) = panel.project(offset + i, v, x_max, lo, hi);
        let cmd = if pen_down { 'L' } else { 'M' };
        path.push_str(&format!("{cmd}{x:.1} {y:.1} "));
        pen_down = true;
    }
    path
}

fn panel_frame(panel: &Panel, label: &str, lo: f64, hi: f64) -> String {
    format!(
        concat!(
            r##"<rect x="{x}" y="{top}" width="{w:.1}" height="{h}" fill="none" stroke="#ccc"/>"##,
            r#"<text x="{x}" y="{label_y:.1}" class="label">{label}</text>"#,
            r#"<text x="{tick_x}" y="{hi_y:.1}" class="tick" text-anchor="end">{hi:.1}</text>"#,
            r#"<text x="{tick_x}" y="{lo_y:.1}" class="tick" text-anchor="end">{lo:.1}</text>"#
        ),
        x = MARGIN_LEFT,
        top = panel.top,
        w = FIG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        h = panel.height,
        label_y = panel.top - 6.0,
        label = label,
        tick_x = MARGIN_LEFT - 6.0,
        hi_y = panel.top + 9.0,
        hi = hi,
        lo_y = panel.top + panel.height,
        lo = lo,
    )
}

fn x_axis_labels(series: &MonthlySeries, last: Option<chrono::NaiveDate>, y: f64) -> String {
    let first = match series.timestamps().first() {
        Some(d) => d.to_string(),
        None => return String::new(),
    };
    let last = last
        .or(series.last_timestamp())
        .map(|d| d.to_string())
        .unwrap_or_default();
    format!(
        concat!(
            r#"<text x="{x0}" y="{y:.1}" class="tick">{first}</text>"#,
            r#"<text x="{x1}" y="{y:.1}" class="tick" text-anchor="end">{last}</text>"#
        ),
        x0 = MARGIN_LEFT,
        y = y,
        first = first,
        x1 = FIG_WIDTH - MARGIN_RIGHT,
        last = last,
    )
}

fn svg_open(height: f64, title: &str) -> String {
    format!(
        concat!(
            r#"<svg viewBox="0 0 {w} {h:.0}" xmlns="http://www.w3.org/2000/svg" role="img" aria-label="{title}">"#,
            r#"<style>.label{{font:bold 12px sans-serif;fill:#333}}"#,
            r#".tick{{font:10px sans-serif;fill:#666}}"#,
            r#".legend{{font:11px sans-serif;fill:#333}}</style>"#
        ),
        w = FIG_WIDTH,
        h = height,
        title = title,
    )
}

/// Four-panel decomposition figure: observed, trend, seasonal, residual.
pub fn decomposition_figure(series: &MonthlySeries, decomposition: &Decomposition) -> String {
    let panels: [(&str, &[f64]); 4] = [
        ("Observed", series.values()),
        ("Trend", &decomposition.trend),
        ("Seasonal", &decomposition.seasonal),
        ("Residual", &decomposition.residual),
    ];
    let x_max = series.len().saturating_sub(1);
    let height = MARGIN_TOP + 4.0 * (PANEL_HEIGHT + MARGIN_TOP) + MARGIN_BOTTOM;

    let mut svg = svg_open(height, "Seasonal decomposition");
    for (slot, (label, values)) in panels.into_iter().enumerate() {
        let panel = Panel {
            top: MARGIN_TOP + slot as f64 * (PANEL_HEIGHT + MARGIN_TOP) + MARGIN_TOP,
            height: PANEL_HEIGHT,
        };
        let (lo, hi) = value_range(&[values]);
        svg.push_str(&panel_frame(&panel, label, lo, hi));
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{HISTORY_COLOR}" stroke-width="1.3"/>"#,
            series_path(values, 0, &panel, x_max, lo, hi),
        ));
    }
    svg.push_str(&x_axis_labels(series, None, height - 8.0));
    svg.push_str("</svg>");
    svg
}

/// Combined figure: historical series (solid) and forecast (dashed) with a
/// legend, drawn on one shared axis.
pub fn forecast_figure(series: &MonthlySeries, forecast: &ForecastTable) -> String {
    let height = MARGIN_TOP + 4.0 * (PANEL_HEIGHT + MARGIN_TOP) + MARGIN_BOTTOM;
    let panel = Panel {
        top: 2.0 * MARGIN_TOP,
        height: height - 2.0 * MARGIN_TOP - MARGIN_BOTTOM - 10.0,
    };
    let x_max = (series.len() + forecast.horizon()).saturating_sub(1);
    let (lo, hi) = value_range(&[series.values(), forecast.values()]);

    let mut svg = svg_open(height, "History and forecast");
    svg.push_str(&panel_frame(&panel, "History and forecast", lo, hi));
    svg.push_str(&format!(
        r#"<path d="{}" fill="none" stroke="{HISTORY_COLOR}" stroke-width="1.5"/>"#,
        series_path(series.values(), 0, &panel, x_max, lo, hi),
    ));
    if !forecast.is_empty() {
        // Anchor the dashed line on the last observation so it reads as a
        // continuation rather than a detached segment.
        let mut joined = Vec::with_capacity(forecast.horizon() + 1);
        joined.extend(series.values().last().copied());
        joined.extend_from_slice(forecast.values());
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{FORECAST_COLOR}" stroke-width="1.5" stroke-dasharray="6 4"/>"#,
            series_path(&joined, series.len() - 1, &panel, x_max, lo, hi),
        ));
    }

    // Legend.
    let legend_y = panel.top + 14.0;
    svg.push_str(&format!(
        concat!(
            r#"<line x1="{lx}" y1="{y1:.1}" x2="{lx2}" y2="{y1:.1}" stroke="{hc}" stroke-width="1.5"/>"#,
            r#"<text x="{tx}" y="{ty1:.1}" class="legend">History</text>"#,
            r#"<line x1="{lx}" y1="{y2:.1}" x2="{lx2}" y2="{y2:.1}" stroke="{fc}" stroke-width="1.5" stroke-dasharray="6 4"/>"#,
            r#"<text x="{tx}" y="{ty2:.1}" class="legend">Forecast</text>"#
        ),
        lx = MARGIN_LEFT + 10.0,
        lx2 = MARGIN_LEFT + 38.0,
        y1 = legend_y,
        ty1 = legend_y + 4.0,
        y2 = legend_y + 18.0,
        ty2 = legend_y + 22.0,
        tx = MARGIN_LEFT + 44.0,
        hc = HISTORY_COLOR,
        fc = FORECAST_COLOR,
    ));

    svg.push_str(&x_axis_labels(
        series,
        forecast.timestamps().last().copied(),
        height - 8.0,
    ));
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::seasonal_decompose;
    use chrono::NaiveDate;

    fn make_report_parts() -> (MonthlySeries, Decomposition, ForecastTable) {
        let values: Vec<f64> = (0..36)
            .map(|i| 100.0 + i as f64 + 10.0 * ((i % 12) as f64 - 6.0))
            .collect();
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let series = MonthlySeries::from_start(start, values.clone()).unwrap();
        let decomposition = seasonal_decompose(&values, 12).unwrap();
        let forecast = ForecastTable::new(
            series.future_index(6).unwrap(),
            vec![150.0, 151.0, 152.0, 153.0, 154.0, 155.0],
        )
        .unwrap();
        (series, decomposition, forecast)
    }

    #[test]
    fn decomposition_figure_has_four_labeled_panels() {
        let (series, decomposition, _) = make_report_parts();
        let svg = decomposition_figure(&series, &decomposition);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        for label in ["Observed", "Trend", "Seasonal", "Residual"] {
            assert!(svg.contains(label), "missing panel label {label}");
        }
        assert_eq!(svg.matches("<path").count(), 4);
    }

    #[test]
    fn nan_edges_do_not_produce_path_points() {
        let (series, decomposition, _) = make_report_parts();
        let svg = decomposition_figure(&series, &decomposition);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn forecast_figure_has_solid_and_dashed_lines_with_legend() {
        let (series, _, forecast) = make_report_parts();
        let svg = forecast_figure(&series, &forecast);

        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("History"));
        assert!(svg.contains("Forecast"));
        assert!(svg.contains(HISTORY_COLOR));
        assert!(svg.contains(FORECAST_COLOR));
        // Axis runs to the last forecast month.
        assert!(svg.contains(&forecast.timestamps().last().unwrap().to_string()));
    }

    #[test]
    fn flat_series_still_renders() {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let series = MonthlySeries::from_start(start, vec![5.0; 24]).unwrap();
        let decomposition = seasonal_decompose(series.values(), 12).unwrap();
        let svg = decomposition_figure(&series, &decomposition);
        assert!(svg.contains("</svg>"));
        assert!(!svg.contains("NaN"));
    }
}
