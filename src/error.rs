/// Errors raised while loading a shot table or writing it back out.
///
/// Filtering and aggregation never fail; an unknown selector or an empty
/// selection is a valid state, not an error.
#[derive(thiserror::Error, Debug)]
pub enum ShotMapError {
    /// The source file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The CSV layer could not decode one record (empty or non-numeric
    /// number cell, wrong field count).
    #[error("row {row}: unreadable record: {source}")]
    UnreadableRow { row: usize, source: csv::Error },

    /// A row's location text is not a two-element numeric array.
    #[error("row {row}: malformed location {raw:?}: {reason}")]
    MalformedLocation {
        row: usize,
        raw: String,
        reason: String,
    },

    /// A row is structurally readable but violates the shot schema.
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    /// Writing an export workbook failed.
    #[error("export to {path} failed: {source}")]
    Export {
        path: String,
        source: rust_xlsxwriter::XlsxError,
    },
}

impl ShotMapError {
    /// Source row index for row-level failures.
    pub fn row(&self) -> Option<usize> {
        match self {
            ShotMapError::UnreadableRow { row, .. }
            | ShotMapError::MalformedLocation { row, .. }
            | ShotMapError::InvalidRecord { row, .. } => Some(*row),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShotMapError>;
