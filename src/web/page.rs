//! HTML rendering for the single-page analysis UI.
//!
//! One page, three states: the idle upload form, a rendered report, or an
//! error banner. The parameter sidebar is re-populated from the submitted
//! configuration so a failed run keeps the user's inputs.

use crate::config::{self, AnalysisConfig};
use crate::error::AnalysisError;
use crate::pipeline::AnalysisReport;
use crate::web::plot;

/// What the results column shows.
pub enum PageState<'a> {
    Idle,
    Error(&'a AnalysisError),
    Report(&'a AnalysisReport),
}

const STYLE: &str = r#"
body{font-family:sans-serif;margin:0;background:#fafafa;color:#222}
header{background:#1f4e79;color:#fff;padding:14px 24px}
header h1{margin:0;font-size:20px}
main{display:flex;gap:24px;padding:24px}
aside{width:260px;flex-shrink:0;background:#fff;border:1px solid #ddd;border-radius:6px;padding:16px}
aside label{display:block;font-size:13px;margin-top:10px}
aside input{width:100%;box-sizing:border-box;margin-top:2px;padding:4px}
aside h2{font-size:15px;margin:14px 0 4px}
section.results{flex:1;min-width:0}
.row{display:flex;gap:24px;flex-wrap:wrap}
.row figure{flex:1 1 40%;min-width:320px;margin:0}
figure figcaption{font-size:13px;color:#555;margin-bottom:6px}
.error{background:#fdecea;border:1px solid #d62728;color:#8a1b17;padding:12px 16px;border-radius:6px}
.warning{background:#fff4e5;border:1px solid #e09b3d;padding:10px 14px;border-radius:6px;font-size:13px}
.table-wrap{max-height:320px;overflow-y:auto;border:1px solid #ddd;background:#fff}
table{border-collapse:collapse;width:100%;font-size:13px}
th,td{border-bottom:1px solid #eee;padding:4px 10px;text-align:right}
th:first-child,td:first-child{text-align:left}
thead th{position:sticky;top:0;background:#f0f0f0}
button{margin-top:14px;padding:8px 14px;background:#1f4e79;color:#fff;border:none;border-radius:4px;cursor:pointer}
details{margin-top:14px;font-size:13px;color:#444}
footer{padding:12px 24px;font-size:12px;color:#888;border-top:1px solid #ddd}
"#;

const HELP: &str = r#"<details><summary>How to use</summary>
<p>Upload a CSV file with a single column of numbers and no header row.
Each value is one monthly observation, oldest first. Pick the date of the
first observation, the forecast horizon, and the model orders, then press
Run analysis.</p>
<p>The page shows the seasonal decomposition of the series, the forecast
chart and table, and a download link for the forecast as CSV.</p>
</details>"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_field(label: &str, name: &str, value: usize, range: (usize, usize)) -> String {
    format!(
        r#"<label>{label}<input type="number" name="{name}" value="{value}" min="{}" max="{}" required></label>"#,
        range.0, range.1,
    )
}

fn sidebar(cfg: &AnalysisConfig) -> String {
    let mut form = String::from(
        r#"<form method="post" action="/analyze" enctype="multipart/form-data">"#,
    );
    form.push_str(&format!(
        r#"<label>Series CSV<input type="file" name="file" accept=".csv,text/csv" required></label>
<label>First observation<input type="date" name="start" value="{}" required></label>"#,
        cfg.start,
    ));
    form.push_str(&number_field(
        "Forecast horizon (months)",
        "horizon",
        cfg.horizon,
        config::HORIZON_RANGE,
    ));
    form.push_str("<h2>Non-seasonal order</h2>");
    form.push_str(&number_field("AR order (p)", "p", cfg.p, config::AR_MA_RANGE));
    form.push_str(&number_field("Differencing (d)", "d", cfg.d, config::DIFF_RANGE));
    form.push_str(&number_field("MA order (q)", "q", cfg.q, config::AR_MA_RANGE));
    form.push_str("<h2>Seasonal order</h2>");
    form.push_str(&number_field(
        "Seasonal AR (P)",
        "sp",
        cfg.seasonal_p,
        config::AR_MA_RANGE,
    ));
    form.push_str(&number_field(
        "Seasonal differencing (D)",
        "sd",
        cfg.seasonal_d,
        config::DIFF_RANGE,
    ));
    form.push_str(&number_field(
        "Seasonal MA (Q)",
        "sq",
        cfg.seasonal_q,
        config::AR_MA_RANGE,
    ));
    form.push_str(&number_field(
        "Seasonal period (s)",
        "s",
        cfg.period,
        config::PERIOD_RANGE,
    ));
    form.push_str(r#"<button type="submit">Run analysis</button></form>"#);
    form.push_str(HELP);
    form
}

fn forecast_table(report: &AnalysisReport) -> String {
    let mut rows = String::new();
    for (date, value) in report.forecast.iter() {
        rows.push_str(&format!("<tr><td>{date}</td><td>{value:.3}</td></tr>"));
    }
    format!(
        r#"<div class="table-wrap"><table>
<thead><tr><th>Month</th><th>Forecast</th></tr></thead>
<tbody>{rows}</tbody></table></div>"#,
    )
}

fn download_form(report: &AnalysisReport) -> String {
    let csv = match report.forecast.to_csv() {
        Ok(csv) => csv,
        Err(err) => {
            return format!(
                r#"<p class="error">Could not prepare the download: {}</p>"#,
                escape_html(&err.to_string()),
            )
        }
    };
    format!(
        r#"<form method="post" action="/download">
<input type="hidden" name="csv" value="{}">
<button type="submit">Download previsao.csv</button></form>"#,
        escape_html(&csv),
    )
}

fn results(state: &PageState<'_>) -> String {
    match state {
        PageState::Idle => String::from(
            "<p>Upload a series and press <strong>Run analysis</strong> to see \
             the decomposition and forecast here.</p>",
        ),
        PageState::Error(err) => format!(
            r#"<div class="error">Failed to process the data: {}</div>"#,
            escape_html(&err.to_string()),
        ),
        PageState::Report(report) => {
            let mut out = String::new();
            if let Some(warning) = &report.fit_warning {
                out.push_str(&format!(
                    r#"<div class="warning">{}</div>"#,
                    escape_html(warning),
                ));
            }
            out.push_str(&format!(
                r#"<div class="row">
<figure><figcaption>Seasonal decomposition</figcaption>{}</figure>
<figure><figcaption>History and forecast</figcaption>{}</figure>
</div>"#,
                plot::decomposition_figure(&report.series, &report.decomposition),
                plot::forecast_figure(&report.series, &report.forecast),
            ));
            out.push_str("<h2>Forecast table</h2>");
            out.push_str(&forecast_table(report));
            out.push_str(&download_form(report));
            out
        }
    }
}

/// Render the full page for the given form values and results state.
pub fn render(cfg: &AnalysisConfig, state: PageState<'_>) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Monthly series forecast</title>
<style>{STYLE}</style></head>
<body>
<header><h1>Monthly series forecast</h1></header>
<main>
<aside>{sidebar}</aside>
<section class="results">{results}</section>
</main>
<footer>Seasonal decomposition and SARIMA forecasting for monthly series.</footer>
</body>
</html>"#,
        sidebar = sidebar(cfg),
        results = results(&state),
    )
}
