use thiserror::Error;

/// Failures of the normalize/aggregate pipeline.
///
/// Every variant is terminal for the call that produced it: no partial
/// series or zero-filled report is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A raw record could not be turned into an `EnergyRecord`.
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// Aggregation was requested on zero records.
    #[error("cannot aggregate an empty series")]
    EmptySeries,

    /// System parameters out of range (non-positive peak power, tilt or azimuth outside bounds).
    #[error("invalid system configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::MalformedRecord { .. } => "MALFORMED_RECORD",
            EngineError::EmptySeries => "EMPTY_SERIES",
            EngineError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Failures while loading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("plant '{id}': {source}")]
    Plant {
        id: String,
        #[source]
        source: EngineError,
    },

    #[error("duplicate plant id '{0}'")]
    DuplicatePlant(String),
}
