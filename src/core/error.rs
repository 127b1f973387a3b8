use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Column '{0}' not found in source '{1}'")]
    ColumnNotFound(String, String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date window: {0}")]
    InvalidWindow(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

pub type Result<T> = std::result::Result<T, DashError>;

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        Self::FetchError(err.to_string())
    }
}

impl From<csv::Error> for DashError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => Self::ParseError(format!("line {}: {}", pos.line(), err)),
            None => Self::ParseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializeError(err.to_string())
    }
}

impl DashError {
    /// True for errors caused by caller input rather than by the dataset.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate(_) | Self::InvalidWindow(_) | Self::InvalidParameter(_)
        )
    }

    /// Stable machine-readable tag, used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FetchError(_) => "fetch_error",
            Self::ParseError(_) => "parse_error",
            Self::ColumnNotFound(..) => "column_not_found",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidWindow(_) => "invalid_window",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::IoError(_) => "io_error",
            Self::SerializeError(_) => "serialize_error",
        }
    }
}
