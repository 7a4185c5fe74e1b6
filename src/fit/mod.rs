//! Least-squares fitting of decline models to production data
//!
//! Fits minimize the sum of squared errors between observations and a model built from a
//! candidate parameter vector with the [Nelder-Mead](crate::NelderMead) minimizer. Candidate
//! vectors rejected by the model constructor give an infinite error, so the search never leaves
//! the valid parameter domain for its result.

use crate::error::SimplexError;
use crate::models::FitParametersTrait;
use crate::nelder_mead::{Bounds, Simplex, inner_simplex};

mod curve_fit;
pub use curve_fit::{CurveFit, FitResult, best_from_interval_volume, best_from_rate};

mod data;
pub use data::{IntervalVolumeData, RateData};

mod objective;
pub use objective::{interval_volume_sse, rate_sse};

/// Starting simplex policy of a model
pub trait FitPolicyTrait<const NPARAMS: usize>: FitParametersTrait<NPARAMS> {
    /// Hand-tuned simplex spanning plausible parameter values
    fn fixed_simplex() -> Simplex<NPARAMS>;

    /// Parameter box bracketing the solution for data with the given peak rate
    fn bounds_guess(peak_rate: f64) -> Bounds<NPARAMS>;
}

/// How the starting simplex of a fit is chosen
#[derive(Clone, Debug, PartialEq, Default)]
pub enum InitsBounds<const NPARAMS: usize> {
    /// Simplex inscribed into the model's [bounds guess](FitPolicyTrait::bounds_guess)
    #[default]
    Default,
    /// Model's [fixed simplex](FitPolicyTrait::fixed_simplex)
    Fixed,
    /// Simplex inscribed into the given bounds
    Bounds(Bounds<NPARAMS>),
    /// Given simplex
    Simplex(Simplex<NPARAMS>),
}

impl<const NPARAMS: usize> InitsBounds<NPARAMS> {
    pub fn bounds(lower: [f64; NPARAMS], upper: [f64; NPARAMS]) -> Self {
        Self::Bounds(Bounds::new(lower, upper))
    }

    pub fn simplex(vertices: Vec<[f64; NPARAMS]>) -> Result<Self, SimplexError> {
        Ok(Self::Simplex(Simplex::new(vertices)?))
    }

    fn initial_simplex<M>(&self, peak_rate: f64) -> Result<Simplex<NPARAMS>, SimplexError>
    where
        M: FitPolicyTrait<NPARAMS>,
    {
        match self {
            Self::Default => inner_simplex(&M::bounds_guess(peak_rate)),
            Self::Fixed => Ok(M::fixed_simplex()),
            Self::Bounds(bounds) => inner_simplex(bounds),
            Self::Simplex(simplex) => Ok(simplex.clone()),
        }
    }
}
