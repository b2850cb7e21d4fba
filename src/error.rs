use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], for callers that only care whether a
/// failure came from bad input, the network, or the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    Transport,
    Decode,
    Io,
    Config,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{} is not a valid {dimension}. Valid values: {valid}", render_values(.values))]
    InvalidParameter {
        dimension: &'static str,
        values: Vec<String>,
        valid: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("response archive contains no entries")]
    EmptyArchive,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("response is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(
        dimension: &'static str,
        values: Vec<String>,
        valid: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            dimension,
            values,
            valid: valid.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Error::Http(_) => ErrorKind::Transport,
            Error::Archive(_) | Error::EmptyArchive | Error::Csv(_) | Error::Utf8(_) => {
                ErrorKind::Decode
            }
            Error::Io(_) => ErrorKind::Io,
            Error::Url(_) | Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Offending input values, if this is a validation error.
    pub fn invalid_values(&self) -> &[String] {
        match self {
            Error::InvalidParameter { values, .. } => values,
            _ => &[],
        }
    }
}

fn render_values(values: &[String]) -> String {
    if values.len() == 1 {
        format!("{:?}", values[0])
    } else {
        format!("{values:?}")
    }
}
