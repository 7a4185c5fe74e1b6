/// Error returned from decline model constructors
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum DeclineError {
    #[error("qi must be non-negative, {qi} is given")]
    NegativeInitialRate { qi: f64 },

    #[error("{name} must be non-negative, {value} is given")]
    NegativeDecline { name: &'static str, value: f64 },

    #[error("b must be in [0, 5], {b} is given")]
    ShapeOutOfRange { b: f64 },

    #[error("Df must be positive, {df} is given")]
    NonPositiveTerminalDecline { df: f64 },

    #[error("{name} must be a number")]
    NotANumber { name: &'static str },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum SimplexError {
    #[error("simplex in {expected_dim}-dimensional space must have {} vertices, {actual} are given", .expected_dim + 1)]
    WrongVertexCount { actual: usize, expected_dim: usize },

    #[error("lower bound exceeds upper bound for parameter #{index}")]
    InvertedBounds { index: usize },
}

/// Error returned from [crate::CurveFit] and the `best_from_*` functions
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum FitError {
    #[error("observation series is empty")]
    EmptySeries,

    #[error("rate series has length {rates} but time series has length {times}")]
    LengthMismatch { rates: usize, times: usize },

    #[error("time step must be positive, {step} is given")]
    NonPositiveTimeStep { step: f64 },

    #[error("invalid initial simplex: {0}")]
    Simplex(#[from] SimplexError),

    #[error("optimizer returned invalid parameters: {0}")]
    Decline(#[from] DeclineError),
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ProductionError {
    #[error("production series is empty")]
    EmptySeries,

    #[error("percentile must be between zero and unity, {p} is given")]
    PercentileOutOfRange { p: f64 },

    #[error("minimum number of wells must be positive")]
    ZeroMinimumWells,
}
