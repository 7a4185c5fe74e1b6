use crate::error::DeclineError;
use crate::fit::FitPolicyTrait;
use crate::models::{DeclineTrait, FitParametersTrait, ZERO_DECLINE_EPS, check_decline, check_qi};
use crate::nelder_mead::{Bounds, Simplex};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const NPARAMS: usize = 2;

macro_const! {
    const DOC: &str = r#"
Arps exponential decline

$$
q(t) = q_i \mathrm{e}^{-D t},
\qquad
Q(t) = \frac{q_i}{D} \left(1 - \mathrm{e}^{-D t}\right),
$$

where $q_i$ is the initial rate and $D$ is the constant nominal decline rate. The cumulative volume
is $q_i t$ when $D$ is below [ZERO_DECLINE_EPS](crate::models::ZERO_DECLINE_EPS).

- Parameter vector: $(q_i, D)$
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(
    try_from = "ExponentialParameters",
    into = "ExponentialParameters"
)]
pub struct Exponential {
    qi: f64,
    d: f64,
}

impl Exponential {
    /// New [Exponential] decline, `qi` and `d` must be non-negative
    pub fn new(qi: f64, d: f64) -> Result<Self, DeclineError> {
        Ok(Self {
            qi: check_qi(qi)?,
            d: check_decline("D", d)?,
        })
    }

    #[inline]
    pub fn qi(&self) -> f64 {
        self.qi
    }

    #[inline]
    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn doc() -> &'static str {
        DOC
    }
}

impl DeclineTrait for Exponential {
    fn rate(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if self.d == 0.0 {
            return self.qi;
        }
        self.qi * f64::exp(-self.d * t)
    }

    fn cumulative(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if self.d < ZERO_DECLINE_EPS {
            return self.qi * t;
        }
        -self.qi / self.d * f64::exp_m1(-self.d * t)
    }

    #[inline]
    fn d_at(&self, _t: f64) -> f64 {
        self.d
    }
}

impl FitParametersTrait<NPARAMS> for Exponential {
    const NAMES: [&'static str; NPARAMS] = ["qi", "D"];

    fn from_parameters(params: &[f64; NPARAMS]) -> Result<Self, DeclineError> {
        let [qi, d] = *params;
        Self::new(qi, d)
    }

    fn parameters(&self) -> [f64; NPARAMS] {
        [self.qi, self.d]
    }
}

impl FitPolicyTrait<NPARAMS> for Exponential {
    fn fixed_simplex() -> Simplex<NPARAMS> {
        Simplex::from_vertices([[1.0, 0.01], [1e6, 0.5], [1e3, 10.0]])
    }

    fn bounds_guess(peak_rate: f64) -> Bounds<NPARAMS> {
        Bounds::new([0.5 * peak_rate, 0.0], [2.0 * peak_rate, 10.0])
    }
}

impl fmt::Display for Exponential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Arps exponential decline: (qi = {}, D = {})>",
            self.qi, self.d
        )
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Exponential")]
struct ExponentialParameters {
    qi: f64,
    d: f64,
}

impl From<Exponential> for ExponentialParameters {
    fn from(f: Exponential) -> Self {
        Self { qi: f.qi, d: f.d }
    }
}

impl TryFrom<ExponentialParameters> for Exponential {
    type Error = DeclineError;

    fn try_from(f: ExponentialParameters) -> Result<Self, Self::Error> {
        Self::new(f.qi, f.d)
    }
}
