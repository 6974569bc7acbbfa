//! HTTP layer: routing, multipart form handling, and the CSV download.

pub mod page;
pub mod plot;

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::web::page::PageState;
use crate::{input, pipeline};

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/download", post(download))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<String> {
    Html(page::render(&AnalysisConfig::default(), PageState::Idle))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn analyze(mut multipart: Multipart) -> Html<String> {
    let mut cfg = AnalysisConfig::default();
    let outcome = match collect_submission(&mut multipart, &mut cfg).await {
        Ok(file) => {
            input::parse_column(&file).and_then(|values| pipeline::run_analysis(&values, &cfg))
        }
        Err(err) => Err(err),
    };
    match outcome {
        Ok(report) => Html(page::render(&cfg, PageState::Report(&report))),
        Err(err) => {
            tracing::warn!(error = %err, "analysis request failed");
            Html(page::render(&cfg, PageState::Error(&err)))
        }
    }
}

/// Drain the multipart stream, applying parameter fields onto `cfg` and
/// returning the uploaded file's bytes.
async fn collect_submission(
    multipart: &mut Multipart,
    cfg: &mut AnalysisConfig,
) -> Result<Vec<u8>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalysisError::Parse(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AnalysisError::Parse(e.to_string()))?;
            file = Some(bytes.to_vec());
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AnalysisError::Parse(e.to_string()))?;
            apply_field(cfg, &name, text.trim())?;
        }
    }
    file.ok_or_else(|| AnalysisError::Parse("no file was uploaded".to_string()))
}

fn apply_field(cfg: &mut AnalysisConfig, name: &str, value: &str) -> Result<()> {
    match name {
        "start" => {
            cfg.start = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                AnalysisError::InvalidParameter(format!("start date '{value}' is not a valid date"))
            })?;
        }
        "horizon" => cfg.horizon = parse_count(name, value)?,
        "p" => cfg.p = parse_count(name, value)?,
        "d" => cfg.d = parse_count(name, value)?,
        "q" => cfg.q = parse_count(name, value)?,
        "sp" => cfg.seasonal_p = parse_count(name, value)?,
        "sd" => cfg.seasonal_d = parse_count(name, value)?,
        "sq" => cfg.seasonal_q = parse_count(name, value)?,
        "s" => cfg.period = parse_count(name, value)?,
        // Unknown fields are ignored rather than rejected.
        _ => {}
    }
    Ok(())
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| {
        AnalysisError::InvalidParameter(format!("{name} must be a whole number, got '{value}'"))
    })
}

#[derive(Deserialize)]
struct DownloadForm {
    csv: String,
}

/// Echo the prepared forecast CSV back as a file attachment. Nothing is
/// stored server-side; the table travels in a hidden form field.
async fn download(Form(form): Form<DownloadForm>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"previsao.csv\"",
            ),
        ],
        form.csv,
    )
}
