//! Forecasts derived from a decline model: interval volumes, time inversions and EUR

use crate::models::DeclineTrait;
use crate::nelder_mead::{NelderMead, Simplex};

use std::iter::FusedIterator;

/// Number of consecutive converged iterations used by the time inversions
pub const INVERSION_TERM_ITER: usize = 50;

/// Iterator over volumes produced during consecutive intervals of equal duration
///
/// Created by [interval_volumes].
#[derive(Clone, Debug)]
pub struct IntervalVolumes<'a, M> {
    model: &'a M,
    t: f64,
    dt: f64,
    previous: f64,
    remaining: usize,
}

impl<M: DeclineTrait> Iterator for IntervalVolumes<'_, M> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.t += self.dt;
        let cumulative = self.model.cumulative(self.t);
        let volume = cumulative - self.previous;
        self.previous = cumulative;
        Some(volume)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<M: DeclineTrait> ExactSizeIterator for IntervalVolumes<'_, M> {}

impl<M: DeclineTrait> FusedIterator for IntervalVolumes<'_, M> {}

/// Volumes produced by `model` over `n` consecutive intervals of duration `dt` starting at `t0`
///
/// Volumes are differences of the cumulative volume at successive time steps, the first one
/// relative to `model.cumulative(t0)`.
pub fn interval_volumes<M: DeclineTrait>(
    model: &M,
    t0: f64,
    dt: f64,
    n: usize,
) -> IntervalVolumes<'_, M> {
    IntervalVolumes {
        model,
        t: t0,
        dt,
        previous: model.cumulative(t0),
        remaining: n,
    }
}

/// Time when the rate of `model` reaches `rate`
///
/// The root is found by one-dimensional Nelder-Mead minimization of $|q(t) - q|$ over $t \geq 0$,
/// zero time is returned for rates above the initial one. Rates below the floating point range
/// of the model tail give imprecise times.
pub fn time_to_rate<M: DeclineTrait>(model: &M, rate: f64) -> f64 {
    invert(|t| model.rate(t), rate)
}

/// Time when the cumulative volume of `model` reaches `cumulative`
///
/// See [time_to_rate] for the details, the cumulative volume of a model with a finite ultimate
/// recovery never reaches larger values.
pub fn time_to_cumulative<M: DeclineTrait>(model: &M, cumulative: f64) -> f64 {
    invert(|t| model.cumulative(t), cumulative)
}

fn invert<F>(f: F, target: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let simplex = Simplex::from_vertices([[0.0], [1.0]]);
    let [t] = NelderMead::default()
        .with_term_iter(INVERSION_TERM_ITER)
        .minimize(
            |&[t]: &[f64; 1]| {
                if t < 0.0 {
                    f64::INFINITY
                } else {
                    f64::abs(f(t) - target)
                }
            },
            &simplex,
        )
        .x;
    t
}

/// Estimated ultimate recovery and the time it is reached
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eur {
    pub volume: f64,
    pub time: f64,
}

/// Estimated ultimate recovery of `model`
///
/// Production stops when the rate falls to `economic_limit` or at `max_time`, whichever comes
/// first. Use [f64::INFINITY] for no time limit. A rate still above `economic_limit` at
/// `max_time` gives `max_time`.
pub fn eur<M: DeclineTrait>(model: &M, economic_limit: f64, max_time: f64) -> Eur {
    let time = if model.rate(max_time) > economic_limit {
        max_time
    } else {
        f64::min(time_to_rate(model, economic_limit), max_time)
    };
    Eur {
        volume: model.cumulative(time),
        time,
    }
}
