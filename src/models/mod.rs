//! Arps decline curves
//!
//! Every model is an immutable function of time built by a validating constructor. Rates and
//! cumulative volumes are zero for negative times. Decline parameters are nominal decline rates
//! per unit time, see [crate::DeclineRate] for conversions from effective rates.

use crate::error::DeclineError;

use enum_dispatch::enum_dispatch;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

mod exponential;
pub use exponential::Exponential;

mod hyperbolic;
pub use hyperbolic::Hyperbolic;

mod hyperbolic_to_exponential;
pub use hyperbolic_to_exponential::HyperbolicToExponential;

/// Decline rates below this value are treated as zero in cumulative volume formulas
pub const ZERO_DECLINE_EPS: f64 = 1e-5;

/// Hyperbolic shape exponents below this value make the curve exponential
pub const ZERO_B_EPS: f64 = 1e-5;

/// Hyperbolic shape exponents closer than this to unity make the curve harmonic
pub const HARMONIC_EPS: f64 = 1e-5;

/// Largest physically plausible hyperbolic shape exponent
pub const MAX_B: f64 = 5.0;

#[enum_dispatch]
pub trait DeclineTrait: Clone + Debug {
    /// Production rate at time `t`
    fn rate(&self, t: f64) -> f64;

    /// Volume produced from zero time to time `t`
    fn cumulative(&self, t: f64) -> f64;

    /// Instantaneous nominal decline rate at time `t`
    fn d_at(&self, t: f64) -> f64;
}

/// Conversion between a model and its ordered parameter vector
pub trait FitParametersTrait<const NPARAMS: usize>: DeclineTrait + Sized {
    /// Parameter names in the order used by the parameter vector
    const NAMES: [&'static str; NPARAMS];

    fn from_parameters(params: &[f64; NPARAMS]) -> Result<Self, DeclineError>;

    fn parameters(&self) -> [f64; NPARAMS];
}

/// Any of the Arps decline models
#[enum_dispatch(DeclineTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum Decline {
    Exponential(Exponential),
    Hyperbolic(Hyperbolic),
    HyperbolicToExponential(HyperbolicToExponential),
}

impl Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential(d) => Display::fmt(d, f),
            Self::Hyperbolic(d) => Display::fmt(d, f),
            Self::HyperbolicToExponential(d) => Display::fmt(d, f),
        }
    }
}

fn check_qi(qi: f64) -> Result<f64, DeclineError> {
    if qi.is_nan() {
        Err(DeclineError::NotANumber { name: "qi" })
    } else if qi < 0.0 {
        Err(DeclineError::NegativeInitialRate { qi })
    } else {
        Ok(qi)
    }
}

fn check_decline(name: &'static str, value: f64) -> Result<f64, DeclineError> {
    if value.is_nan() {
        Err(DeclineError::NotANumber { name })
    } else if value < 0.0 {
        Err(DeclineError::NegativeDecline { name, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use approx::assert_relative_eq;

    fn all_models() -> Vec<Decline> {
        let d = nominal_from_tangent(0.95);
        vec![
            Exponential::new(1000.0, d).unwrap().into(),
            Exponential::new(1000.0, 0.0).unwrap().into(),
            Hyperbolic::new(1000.0, d, 0.0).unwrap().into(),
            Hyperbolic::new(1000.0, d, 0.5).unwrap().into(),
            Hyperbolic::new(1000.0, d, 1.0).unwrap().into(),
            Hyperbolic::new(1000.0, d, 1.5).unwrap().into(),
            Hyperbolic::new(1000.0, 0.0, 1.5).unwrap().into(),
            HyperbolicToExponential::new(1000.0, d, 1.5, nominal_from_tangent(0.05))
                .unwrap()
                .into(),
            HyperbolicToExponential::new(1000.0, 0.1, 1.5, 0.5)
                .unwrap()
                .into(),
        ]
    }

    #[test]
    fn negative_time_is_zero() {
        for model in all_models() {
            for t in [-1e300, -100.0, -1.0, -1e-12] {
                assert_eq!(model.rate(t), 0.0, "{model}");
                assert_eq!(model.cumulative(t), 0.0, "{model}");
            }
        }
    }

    #[test]
    fn rate_at_zero_is_qi() {
        for model in all_models() {
            assert_eq!(model.rate(0.0), 1000.0, "{model}");
            assert_eq!(model.cumulative(0.0), 0.0, "{model}");
        }
    }

    #[test]
    fn non_increasing_rate_non_decreasing_cumulative() {
        for model in all_models() {
            let t = linspace(0.0, 50.0, 501);
            for w in t.windows(2) {
                assert!(model.rate(w[1]) <= model.rate(w[0]), "{model}");
                assert!(model.cumulative(w[1]) >= model.cumulative(w[0]), "{model}");
            }
        }
    }

    #[test]
    fn cumulative_is_integral_of_rate() {
        const N: usize = 20_000;
        const T: f64 = 3.0;
        for model in all_models() {
            let dt = T / N as f64;
            // midpoint rule
            let integral: f64 = (0..N)
                .map(|i| model.rate((i as f64 + 0.5) * dt) * dt)
                .sum();
            assert_relative_eq!(model.cumulative(T), integral, max_relative = 1e-6);
        }
    }

    #[test]
    fn enum_serialization() {
        for model in all_models() {
            let json = serde_json::to_string(&model).unwrap();
            let back: Decline = serde_json::from_str(&json).unwrap();
            assert_eq!(back, model);
        }
    }

    #[test]
    fn display() {
        let model: Decline = Exponential::new(1000.0, 0.5).unwrap().into();
        assert_eq!(
            model.to_string(),
            "<Arps exponential decline: (qi = 1000, D = 0.5)>"
        );
    }
}
