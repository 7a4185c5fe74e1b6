use crate::fit::data::{IntervalVolumeData, RateData};
use crate::models::{DeclineTrait, FitParametersTrait};

use ndarray::Zip;

/// Sum of squared differences between observed and modeled rates
pub fn rate_sse<M: DeclineTrait>(model: &M, data: &RateData) -> f64 {
    let mut sse = 0.0;
    Zip::from(&data.rate).and(&data.t).for_each(|&rate, &t| {
        let residual = rate - model.rate(t);
        sse += residual * residual;
    });
    sse
}

/// Sum of squared differences between observed and modeled interval volumes
///
/// The modeled volume of every interval is the difference of the cumulative volumes at its ends.
pub fn interval_volume_sse<M: DeclineTrait>(model: &M, data: &IntervalVolumeData) -> f64 {
    let mut t = data.t0;
    let mut previous = model.cumulative(t);
    let mut sse = 0.0;
    for &volume in &data.volume {
        t += data.dt;
        let cumulative = model.cumulative(t);
        let residual = volume - (cumulative - previous);
        sse += residual * residual;
        previous = cumulative;
    }
    sse
}

/// Objective value of a parameter vector
///
/// Parameters rejected by the model constructor and NaN errors give infinity.
pub(super) fn contained<M, F, const NPARAMS: usize>(params: &[f64; NPARAMS], sse: F) -> f64
where
    M: FitParametersTrait<NPARAMS>,
    F: Fn(&M) -> f64,
{
    match M::from_parameters(params) {
        Ok(model) => {
            let value = sse(&model);
            if value.is_nan() { f64::INFINITY } else { value }
        }
        Err(_) => f64::INFINITY,
    }
}
