use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dataset load error: {0}")]
    Load(#[from] csv::Error),

    #[error("Invalid value {value:?} for column '{column}' at row {row}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Unknown control: {0}")]
    UnknownControl(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
