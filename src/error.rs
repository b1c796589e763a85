use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the load → statistic → render pipeline
// ---------------------------------------------------------------------------

/// The data source is missing, unreadable, or does not have the expected shape.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': {reason}")]
    Malformed {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// A statistic was requested on data that cannot support it.
#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("group '{0}' has no observations")]
    EmptyGroup(String),

    #[error("group '{group}' has {n} observation(s), at least {required} required")]
    InsufficientObservations {
        group: String,
        n: usize,
        required: usize,
    },

    #[error("both samples have zero variance; the t statistic is undefined")]
    DegenerateVariance,

    #[error("row {0} has no key; cannot compute a per-key total")]
    MissingKey(usize),

    #[error("values for key '{0}' sum to zero; cannot compute a percentage")]
    ZeroKeyTotal(String),

    #[error("comparison group '{0}' is not part of the display order")]
    UnknownGroup(String),

    #[error("p-value {0} is outside [0, 1]")]
    InvalidPValue(f64),

    #[error("distribution: {0}")]
    Distribution(String),
}

/// The figure cannot be composed or written.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("y axis collapsed: lower bound {min} is not below upper bound {max}")]
    AxisCollapse { min: f64, max: f64 },

    #[error("y axis [{min}, {max}] does not contain the data range [{data_min}, {data_max}]")]
    AxisExcludesData {
        min: f64,
        max: f64,
        data_min: f64,
        data_max: f64,
    },

    #[error("tick step {step} from {start} gives {count} ticks, at most {limit} are drawn")]
    TooManyTicks {
        step: f64,
        start: f64,
        count: f64,
        limit: usize,
    },

    #[error("no significance letter supplied for group '{0}'")]
    MissingLetter(String),

    #[error("invalid colour '{value}' for group '{group}'")]
    InvalidColor { group: String, value: String },

    #[error("drawing backend: {0}")]
    Backend(String),

    #[error("encoding {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a single pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Plotters errors are generic over the backend error type; keep the message only.
impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for RenderError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(err.to_string())
    }
}
