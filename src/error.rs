use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a run. Everything else is absorbed inside the pipeline.
#[derive(Debug, Error)]
pub enum SocialMapError {
    #[error("invalid source {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("edge weight {weight} has no width under log base {base}")]
    DegenerateWeight { weight: i64, base: f64 },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SocialMapError>;

impl SocialMapError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SocialMapError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// Allow `?` on std::io::Error by converting to SocialMapError::Io with unknown path.
impl From<std::io::Error> for SocialMapError {
    fn from(source: std::io::Error) -> Self {
        SocialMapError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

/// A centrality algorithm could not produce scores for the graph it was given.
///
/// Never leaves the ranker: it is answered with the betweenness fallback.
#[derive(Debug, Error, PartialEq)]
pub enum CentralityError {
    #[error("centrality is undefined for a graph without nodes")]
    EmptyGraph,

    #[error("power iteration failed to converge in {0} iterations")]
    NotConverged(usize),
}
