use thiserror::Error;

#[derive(Error, Debug)]
pub enum EphemError {
    #[error("HTTP ureq error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Horizons request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Horizons API error for COMMAND={command}: {message}")]
    HorizonsApi { command: i64, message: String },

    #[error("Horizons response has no result field for COMMAND={command}")]
    MissingResult { command: i64 },

    #[error("Horizons response missing $$SOE/$$EOE block; response starts with:\n{excerpt}")]
    MissingDataBlock { excerpt: String },

    #[error("ephemeris contains too few samples ({got}, expected >= 2): {detail}")]
    InsufficientSamples { got: usize, detail: String },

    #[error("ephemeris holds {components} vector components for {epochs} epochs (expected {})", .epochs * 6)]
    ComponentCountMismatch { epochs: usize, components: usize },

    #[error(
        "no ephemeris for COMMAND={command} before JD {earliest}, at or past the requested stop JD {stop}"
    )]
    UnsatisfiableWindow { command: i64, earliest: f64, stop: f64 },

    #[error("time grid length mismatch for {body}: {got} epochs against {expected} in the reference axis")]
    TimeGridLength {
        body: String,
        got: usize,
        expected: usize,
    },

    #[error("time grid mismatch for {body} at index {index}: JD {got} differs from reference JD {expected}")]
    TimeGridEpoch {
        body: String,
        index: usize,
        got: f64,
        expected: f64,
    },

    #[error("invalid step size: {0}")]
    InvalidStepSize(String),

    #[error("unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
