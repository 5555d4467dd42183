//! Result export formatting (CSV and JSON downloads)

use crate::models::StockResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export produced non-utf8 output")]
    Encoding,
}

const CSV_HEADER: [&str; 16] = [
    "stock",
    "consolidating",
    "breaking_out",
    "ltp",
    "volume",
    "ma_signal",
    "rsi",
    "trend",
    "pattern",
    "t_plus_1d",
    "t_plus_1wk",
    "t_plus_1mo",
    "t_plus_6mo",
    "t_plus_1y",
    "t_plus_52wk_high",
    "t_plus_52wk_low",
];

/// Render results as CSV with a fixed column set
///
/// Backtest columns are always present and empty when unpopulated, so
/// every export of the same schema version has identical headers.
pub fn results_to_csv(results: &[StockResult]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for result in results {
        writer.write_record([
            result.stock.as_str(),
            result.consolidating.as_str(),
            result.breaking_out.as_str(),
            result.ltp.as_str(),
            result.volume.as_str(),
            result.ma_signal.as_str(),
            &result.rsi.to_string(),
            result.trend.as_str(),
            result.pattern.as_str(),
            result.t_plus_1d.as_deref().unwrap_or(""),
            result.t_plus_1wk.as_deref().unwrap_or(""),
            result.t_plus_1mo.as_deref().unwrap_or(""),
            result.t_plus_6mo.as_deref().unwrap_or(""),
            result.t_plus_1y.as_deref().unwrap_or(""),
            result.t_plus_52wk_high.as_deref().unwrap_or(""),
            result.t_plus_52wk_low.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

/// Render results as pretty-printed JSON
pub fn results_to_json(results: &[StockResult]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(results)?)
}
