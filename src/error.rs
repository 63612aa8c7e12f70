#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error("Field `{0}` not found")]
    MissingField(String),
    #[error("Field `{field}` has shape {found:?}, expected {expected}")]
    InvalidDimensions {
        field: &'static str,
        expected: &'static str,
        found: Vec<usize>,
    },
    #[error("Field `{field}` holds {value} at flat index {index}")]
    NonFiniteValue {
        field: &'static str,
        index: usize,
        value: f64,
    },
    #[error("Sampling rate array is empty")]
    EmptySamplingRate,
    #[error("Receiver axis has {0} channels, expected 2")]
    InvalidChannelCount(usize),
    #[error("{positions} source positions but {responses} impulse responses")]
    PositionCountMismatch { positions: usize, responses: usize },
}
