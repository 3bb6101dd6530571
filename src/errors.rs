use thiserror::Error;

/// The payload could not be turned into a usable header+data matrix.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot decode spreadsheet: {0}")]
    Decode(#[from] calamine::Error),
    #[error("workbook contains no worksheet")]
    NoSheet,
    #[error("sheet needs a header row and at least one data row")]
    TooFewRows,
}

/// Rejections raised before any parsing or mapping work is committed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported file type {0:?}, expected .xlsx or .xls")]
    UnsupportedFile(String),
    #[error("missing metadata: {0}")]
    MissingMetadata(&'static str),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("cannot read upload")]
    Io(#[from] std::io::Error),
}

/// Non-fatal notices attached to an otherwise successful upload.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UploadWarning {
    #[error("no roll-number or name column was recognized; values were inferred per row")]
    FieldInference,
}

/// Row-editing rejections. No store state changes when one of these is returned.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum EditError {
    #[error("another row is already being edited")]
    EditInProgress,
    #[error("no row with id {0:?}")]
    UnknownRow(String),
    #[error("no edit is in progress")]
    NoActiveEdit,
    #[error("required fields missing: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),
}
