use crate::error::FitError;

use ndarray::Array1;

/// Production rates observed at given times
#[derive(Clone, Debug)]
pub struct RateData {
    pub rate: Array1<f64>,
    pub t: Array1<f64>,
}

impl RateData {
    pub fn new(rate: &[f64], t: &[f64]) -> Result<Self, FitError> {
        if rate.len() != t.len() {
            return Err(FitError::LengthMismatch {
                rates: rate.len(),
                times: t.len(),
            });
        }
        if rate.is_empty() {
            return Err(FitError::EmptySeries);
        }
        Ok(Self {
            rate: Array1::from_vec(rate.to_vec()),
            t: Array1::from_vec(t.to_vec()),
        })
    }

    pub fn len(&self) -> usize {
        self.rate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rate.is_empty()
    }

    /// Largest observed rate
    pub fn peak_rate(&self) -> f64 {
        self.rate.fold(f64::NEG_INFINITY, |max, &x| f64::max(max, x))
    }
}

/// Volumes produced over consecutive intervals of duration `dt` starting at `t0`
#[derive(Clone, Debug)]
pub struct IntervalVolumeData {
    pub volume: Array1<f64>,
    pub t0: f64,
    pub dt: f64,
}

impl IntervalVolumeData {
    pub fn new(volume: &[f64], t0: f64, dt: f64) -> Result<Self, FitError> {
        if volume.is_empty() {
            return Err(FitError::EmptySeries);
        }
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(FitError::NonPositiveTimeStep { step: dt });
        }
        Ok(Self {
            volume: Array1::from_vec(volume.to_vec()),
            t0,
            dt,
        })
    }

    pub fn len(&self) -> usize {
        self.volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    /// Largest interval volume divided by the interval duration
    pub fn peak_rate(&self) -> f64 {
        self.volume.fold(f64::NEG_INFINITY, |max, &x| f64::max(max, x)) / self.dt
    }
}
