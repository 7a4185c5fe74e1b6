use crate::error::DeclineError;
use crate::fit::FitPolicyTrait;
use crate::models::{DeclineTrait, Exponential, FitParametersTrait, Hyperbolic};
use crate::nelder_mead::{Bounds, Simplex};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const NPARAMS: usize = 4;

macro_const! {
    const DOC: &str = r#"
Modified Arps decline: hyperbolic decline switching to exponential decline

The instantaneous nominal decline rate of the [Hyperbolic](crate::Hyperbolic) curve
$D(t) = D_i / (1 + b D_i t)$ falls with time. Once it reaches the terminal decline rate $D_f$ the
curve continues as an [Exponential](crate::Exponential) decline with rate $D_f$. The switch
happens at

$$
t_\mathrm{trans} = \frac{D_i / D_f - 1}{b D_i},
$$

so both the rate and the decline rate are continuous. The transition time is zero if
$D_f \geq D_i$ and the curve is purely exponential with decline $D_f$. It is infinite for
$b = 0$ and $D_i > D_f$, the curve never leaves the hyperbolic segment then.

- Parameter vector: $(q_i, D_i, b, D_f)$
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(
    try_from = "HyperbolicToExponentialParameters",
    into = "HyperbolicToExponentialParameters"
)]
pub struct HyperbolicToExponential {
    df: f64,
    transition_time: f64,
    hyperbolic: Hyperbolic,
    exponential: Exponential,
    cumulative_at_transition: f64,
}

impl HyperbolicToExponential {
    /// New [HyperbolicToExponential] decline
    ///
    /// `qi`, `di` and `b` follow [Hyperbolic::new] rules, `df` must be positive.
    pub fn new(qi: f64, di: f64, b: f64, df: f64) -> Result<Self, DeclineError> {
        let hyperbolic = Hyperbolic::new(qi, di, b)?;
        if df.is_nan() {
            return Err(DeclineError::NotANumber { name: "Df" });
        }
        if df <= 0.0 {
            return Err(DeclineError::NonPositiveTerminalDecline { df });
        }

        let transition_time = {
            let t = (di / df - 1.0) / (b * di);
            // NaN for di == df with zero b
            if t > 0.0 { t } else { 0.0 }
        };
        let (rate_at_transition, cumulative_at_transition) = if transition_time.is_finite() {
            (
                hyperbolic.rate(transition_time),
                hyperbolic.cumulative(transition_time),
            )
        } else {
            (0.0, hyperbolic.cumulative(f64::INFINITY))
        };
        let exponential = Exponential::new(rate_at_transition, df)?;

        Ok(Self {
            df,
            transition_time,
            hyperbolic,
            exponential,
            cumulative_at_transition,
        })
    }

    #[inline]
    pub fn qi(&self) -> f64 {
        self.hyperbolic.qi()
    }

    #[inline]
    pub fn di(&self) -> f64 {
        self.hyperbolic.di()
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.hyperbolic.b()
    }

    #[inline]
    pub fn df(&self) -> f64 {
        self.df
    }

    /// Time of the switch from hyperbolic to exponential decline, may be infinite
    #[inline]
    pub fn transition_time(&self) -> f64 {
        self.transition_time
    }

    pub fn doc() -> &'static str {
        DOC
    }

    fn is_hyperbolic_at(&self, t: f64) -> bool {
        t < self.transition_time || self.transition_time == f64::INFINITY
    }
}

impl DeclineTrait for HyperbolicToExponential {
    fn rate(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if self.is_hyperbolic_at(t) {
            self.hyperbolic.rate(t)
        } else {
            self.exponential.rate(t - self.transition_time)
        }
    }

    fn cumulative(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if self.is_hyperbolic_at(t) {
            self.hyperbolic.cumulative(t)
        } else {
            self.cumulative_at_transition + self.exponential.cumulative(t - self.transition_time)
        }
    }

    fn d_at(&self, t: f64) -> f64 {
        if self.is_hyperbolic_at(t) {
            self.hyperbolic.d_at(t)
        } else {
            self.df
        }
    }
}

impl FitParametersTrait<NPARAMS> for HyperbolicToExponential {
    const NAMES: [&'static str; NPARAMS] = ["qi", "Di", "b", "Df"];

    fn from_parameters(params: &[f64; NPARAMS]) -> Result<Self, DeclineError> {
        let [qi, di, b, df] = *params;
        Self::new(qi, di, b, df)
    }

    fn parameters(&self) -> [f64; NPARAMS] {
        [self.qi(), self.di(), self.b(), self.df]
    }
}

impl FitPolicyTrait<NPARAMS> for HyperbolicToExponential {
    fn fixed_simplex() -> Simplex<NPARAMS> {
        Simplex::from_vertices([
            [1.0, 0.01, 0.1, 0.05],
            [1e4, 5.0, 5.0, 0.05],
            [5e2, 2.3, 2.0, 0.15],
            [1e3, 1.5, 1.5, 0.10],
            [50.0, 1.0, 0.75, 0.05],
        ])
    }

    fn bounds_guess(peak_rate: f64) -> Bounds<NPARAMS> {
        Bounds::new(
            // Df must be positive, so the lower corner stays a valid model
            [0.5 * peak_rate, 0.0, 0.0, 1e-3],
            [2.0 * peak_rate, 10.0, 3.0, 10.0],
        )
    }
}

impl fmt::Display for HyperbolicToExponential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Arps modified hyperbolic decline: (qi = {}, Di = {}, b = {}, Df = {})>",
            self.qi(),
            self.di(),
            self.b(),
            self.df
        )
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "HyperbolicToExponential")]
struct HyperbolicToExponentialParameters {
    qi: f64,
    di: f64,
    b: f64,
    df: f64,
}

impl From<HyperbolicToExponential> for HyperbolicToExponentialParameters {
    fn from(f: HyperbolicToExponential) -> Self {
        Self {
            qi: f.qi(),
            di: f.di(),
            b: f.b(),
            df: f.df,
        }
    }
}

impl TryFrom<HyperbolicToExponentialParameters> for HyperbolicToExponential {
    type Error = DeclineError;

    fn try_from(f: HyperbolicToExponentialParameters) -> Result<Self, Self::Error> {
        Self::new(f.qi, f.di, f.b, f.df)
    }
}
