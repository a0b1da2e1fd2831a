use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} contains no data")]
    EmptyTable { path: PathBuf },

    #[error("no header row found in {path} (probed the first {probed} rows)")]
    NoHeaderRow { path: PathBuf, probed: usize },
}

pub type Result<T> = std::result::Result<T, IngestError>;
