use crate::error::FitError;
use crate::fit::data::{IntervalVolumeData, RateData};
use crate::fit::objective::{contained, interval_volume_sse, rate_sse};
use crate::fit::{FitPolicyTrait, InitsBounds};
use crate::nelder_mead::NelderMead;

/// Curve fit settings
///
/// `NPARAMS` is the number of parameters of the model to fit:
/// 2 for [Exponential](crate::Exponential), 3 for [Hyperbolic](crate::Hyperbolic) and 4 for
/// [HyperbolicToExponential](crate::HyperbolicToExponential).
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFit<const NPARAMS: usize> {
    pub algorithm: NelderMead,
    pub inits_bounds: InitsBounds<NPARAMS>,
}

/// Fitted model with fit diagnostics
#[derive(Clone, Debug, PartialEq)]
pub struct FitResult<M> {
    pub model: M,
    /// Sum of squared errors of `model`
    pub sse: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl<const NPARAMS: usize> CurveFit<NPARAMS> {
    pub fn new(algorithm: NelderMead, inits_bounds: InitsBounds<NPARAMS>) -> Self {
        Self {
            algorithm,
            inits_bounds,
        }
    }

    /// Default [NelderMead] settings, 300 iterations
    #[inline]
    pub fn default_algorithm() -> NelderMead {
        NelderMead::default()
    }

    #[inline]
    pub fn default_inits_bounds() -> InitsBounds<NPARAMS> {
        InitsBounds::Default
    }

    /// Fit model to rates observed at given times
    pub fn fit_rate<M>(&self, rate: &[f64], t: &[f64]) -> Result<FitResult<M>, FitError>
    where
        M: FitPolicyTrait<NPARAMS>,
    {
        let data = RateData::new(rate, t)?;
        log::debug!(
            "fitting {} model to {} rate observations",
            std::any::type_name::<M>(),
            data.len(),
        );
        self.fit(data.peak_rate(), |model: &M| rate_sse(model, &data))
    }

    /// Fit model to volumes produced over consecutive intervals of duration `dt` starting at `t0`
    pub fn fit_interval_volume<M>(
        &self,
        volume: &[f64],
        t0: f64,
        dt: f64,
    ) -> Result<FitResult<M>, FitError>
    where
        M: FitPolicyTrait<NPARAMS>,
    {
        let data = IntervalVolumeData::new(volume, t0, dt)?;
        log::debug!(
            "fitting {} model to {} interval volumes",
            std::any::type_name::<M>(),
            data.len(),
        );
        self.fit(data.peak_rate(), |model: &M| interval_volume_sse(model, &data))
    }

    fn fit<M, F>(&self, peak_rate: f64, sse: F) -> Result<FitResult<M>, FitError>
    where
        M: FitPolicyTrait<NPARAMS>,
        F: Fn(&M) -> f64,
    {
        let simplex = self.inits_bounds.initial_simplex::<M>(peak_rate)?;
        log::debug!("initial simplex: {:?}", simplex.vertices());

        let result = self
            .algorithm
            .minimize(|params| contained(params, &sse), &simplex);
        if !result.converged {
            log::warn!(
                "fit stopped after {} iterations without convergence, SSE = {}",
                result.iterations,
                result.value,
            );
        }

        Ok(FitResult {
            model: M::from_parameters(&result.x)?,
            sse: result.value,
            iterations: result.iterations,
            converged: result.converged,
        })
    }
}

impl<const NPARAMS: usize> Default for CurveFit<NPARAMS> {
    fn default() -> Self {
        Self::new(Self::default_algorithm(), Self::default_inits_bounds())
    }
}

/// Best fit of model `M` to rates observed at given times with default [CurveFit] settings
///
/// ```
/// use decline_curve::{Exponential, best_from_rate};
///
/// let t = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let rate = t.map(|t| 100.0 * f64::exp(-0.5 * t));
/// let model = best_from_rate::<Exponential, 2>(&rate, &t).unwrap();
/// assert!((model.d() - 0.5).abs() < 1e-3);
/// ```
pub fn best_from_rate<M, const NPARAMS: usize>(rate: &[f64], t: &[f64]) -> Result<M, FitError>
where
    M: FitPolicyTrait<NPARAMS>,
{
    Ok(CurveFit::default().fit_rate(rate, t)?.model)
}

/// Best fit of model `M` to interval volumes with default [CurveFit] settings
///
/// `volume[i]` is the volume produced from `t0 + i * dt` to `t0 + (i + 1) * dt`.
pub fn best_from_interval_volume<M, const NPARAMS: usize>(
    volume: &[f64],
    t0: f64,
    dt: f64,
) -> Result<M, FitError>
where
    M: FitPolicyTrait<NPARAMS>,
{
    Ok(CurveFit::default().fit_interval_volume(volume, t0, dt)?.model)
}
