use crate::decline_rate::{DeclineRate, decline};
use crate::models::DeclineTrait;

pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Nominal decline rate from tangent-effective one
pub fn nominal_from_tangent(d: f64) -> f64 {
    decline(d, DeclineRate::TangentEffective, 1.0)
}

/// Noiseless rates of `model` at times `t`
pub fn rate_series<M: DeclineTrait>(model: &M, t: &[f64]) -> (Vec<f64>, Vec<f64>) {
    (t.iter().map(|&t| model.rate(t)).collect(), t.to_vec())
}
