#![doc = include_str!("../README.md")]

#[cfg(test)]
mod tests;

pub mod decline_rate;
pub use decline_rate::{DeclineRate, convert_decline, decline};

mod error;
pub use error::{DeclineError, FitError, ProductionError, SimplexError};

pub mod fit;
pub use fit::{
    CurveFit, FitPolicyTrait, FitResult, InitsBounds, best_from_interval_volume, best_from_rate,
};

pub mod forecast;
pub use forecast::{
    Eur, IntervalVolumes, eur, interval_volumes, time_to_cumulative, time_to_rate,
};

pub mod models;
pub use models::{
    Decline, DeclineTrait, Exponential, FitParametersTrait, Hyperbolic, HyperbolicToExponential,
};

pub mod nelder_mead;
pub use nelder_mead::{Bounds, NelderMead, NelderMeadResult, Simplex, inner_simplex, nelder_mead};

pub mod production;
pub use production::{
    Aggregation, aggregate_production, shift_to_peak, shift_to_peak_tied, trim_trailing_zeros,
};

pub use ndarray;
