use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while talking to the portal or reading its pages.
///
/// None of these abort a run: the pipeline logs them and treats the affected
/// term or discipline as having no data.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("could not parse {what}: {reason}")]
    Parse { what: String, reason: String },

    #[error("schedule table not found: wanted table index {wanted} but the page has {found} table(s)")]
    ScheduleTableNotFound { wanted: usize, found: usize },
}

impl ScrapeError {
    pub fn parse(what: impl Into<String>, reason: impl ToString) -> Self {
        ScrapeError::Parse {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to serialise JSON export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("sheet '{sheet}' has too many {what} for an xlsx worksheet")]
    TooLarge { sheet: String, what: &'static str },
}
