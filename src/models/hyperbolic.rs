use crate::error::DeclineError;
use crate::fit::FitPolicyTrait;
use crate::models::{
    DeclineTrait, FitParametersTrait, HARMONIC_EPS, MAX_B, ZERO_B_EPS, ZERO_DECLINE_EPS,
    check_decline, check_qi,
};
use crate::nelder_mead::{Bounds, Simplex};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const NPARAMS: usize = 3;

macro_const! {
    const DOC: &str = r#"
Arps hyperbolic decline

$$
q(t) = q_i \left(1 + b D_i t\right)^{-1/b},
\qquad
Q(t) = \frac{q_i}{(1 - b) D_i} \left(1 - \left(1 + b D_i t\right)^{1 - 1/b}\right),
$$

where $q_i$ is the initial rate, $D_i$ is the initial nominal decline rate and $b \in [0, 5]$ is
the shape exponent. The curve collapses to the exponential decline for $b \to 0$ and to the
harmonic decline for $b \to 1$:

$$
q(t) = \frac{q_i}{1 + D_i t},
\qquad
Q(t) = \frac{q_i}{D_i} \ln\left(1 + D_i t\right).
$$

Both limits are evaluated by their own closed forms when $b$ is within
[ZERO_B_EPS](crate::models::ZERO_B_EPS) of zero or [HARMONIC_EPS](crate::models::HARMONIC_EPS)
of unity. The cumulative volume grows without bound for $b \geq 1$.

- Parameter vector: $(q_i, D_i, b)$
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(try_from = "HyperbolicParameters", into = "HyperbolicParameters")]
pub struct Hyperbolic {
    qi: f64,
    di: f64,
    b: f64,
}

impl Hyperbolic {
    /// New [Hyperbolic] decline
    ///
    /// `qi` and `di` must be non-negative and `b` must be in $[0, 5]$.
    pub fn new(qi: f64, di: f64, b: f64) -> Result<Self, DeclineError> {
        if b.is_nan() {
            return Err(DeclineError::NotANumber { name: "b" });
        }
        if !(0.0..=MAX_B).contains(&b) {
            return Err(DeclineError::ShapeOutOfRange { b });
        }
        Ok(Self {
            qi: check_qi(qi)?,
            di: check_decline("Di", di)?,
            b,
        })
    }

    #[inline]
    pub fn qi(&self) -> f64 {
        self.qi
    }

    #[inline]
    pub fn di(&self) -> f64 {
        self.di
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn doc() -> &'static str {
        DOC
    }

    fn is_exponential(&self) -> bool {
        self.b < ZERO_B_EPS
    }

    fn is_harmonic(&self) -> bool {
        f64::abs(1.0 - self.b) < HARMONIC_EPS
    }
}

impl DeclineTrait for Hyperbolic {
    fn rate(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if self.di == 0.0 {
            return self.qi;
        }
        if self.is_exponential() {
            return self.qi * f64::exp(-self.di * t);
        }
        if self.is_harmonic() {
            return self.qi / (1.0 + self.di * t);
        }
        self.qi * f64::powf(1.0 + self.b * self.di * t, -1.0 / self.b)
    }

    fn cumulative(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if self.di < ZERO_DECLINE_EPS {
            return self.qi * t;
        }
        if self.is_exponential() {
            return -self.qi / self.di * f64::exp_m1(-self.di * t);
        }
        if self.is_harmonic() {
            return self.qi / self.di * f64::ln_1p(self.di * t);
        }
        self.qi / ((1.0 - self.b) * self.di)
            * (1.0 - f64::powf(1.0 + self.b * self.di * t, 1.0 - 1.0 / self.b))
    }

    fn d_at(&self, t: f64) -> f64 {
        if self.di == 0.0 || self.b == 0.0 {
            return self.di;
        }
        self.di / (1.0 + self.b * self.di * t)
    }
}

impl FitParametersTrait<NPARAMS> for Hyperbolic {
    const NAMES: [&'static str; NPARAMS] = ["qi", "Di", "b"];

    fn from_parameters(params: &[f64; NPARAMS]) -> Result<Self, DeclineError> {
        let [qi, di, b] = *params;
        Self::new(qi, di, b)
    }

    fn parameters(&self) -> [f64; NPARAMS] {
        [self.qi, self.di, self.b]
    }
}

impl FitPolicyTrait<NPARAMS> for Hyperbolic {
    fn fixed_simplex() -> Simplex<NPARAMS> {
        Simplex::from_vertices([
            [1.0, 0.01, 0.0],
            [1e6, 1.0, 0.0],
            [1e5, 10.0, 0.0],
            [1e4, 5.0, 3.0],
        ])
    }

    fn bounds_guess(peak_rate: f64) -> Bounds<NPARAMS> {
        Bounds::new([0.5 * peak_rate, 0.0, 0.0], [2.0 * peak_rate, 10.0, 3.0])
    }
}

impl fmt::Display for Hyperbolic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Arps hyperbolic decline: (qi = {}, Di = {}, b = {})>",
            self.qi, self.di, self.b
        )
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Hyperbolic")]
struct HyperbolicParameters {
    qi: f64,
    di: f64,
    b: f64,
}

impl From<Hyperbolic> for HyperbolicParameters {
    fn from(f: Hyperbolic) -> Self {
        Self {
            qi: f.qi,
            di: f.di,
            b: f.b,
        }
    }
}

impl TryFrom<HyperbolicParameters> for Hyperbolic {
    type Error = DeclineError;

    fn try_from(f: HyperbolicParameters) -> Result<Self, Self::Error> {
        Self::new(f.qi, f.di, f.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exponential;
    use crate::tests::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            Hyperbolic::new(-1.0, 0.1, 1.0),
            Err(DeclineError::NegativeInitialRate { qi: -1.0 })
        );
        assert_eq!(
            Hyperbolic::new(1.0, -0.1, 1.0),
            Err(DeclineError::NegativeDecline {
                name: "Di",
                value: -0.1
            })
        );
        assert_eq!(
            Hyperbolic::new(1.0, 0.1, -0.5),
            Err(DeclineError::ShapeOutOfRange { b: -0.5 })
        );
        assert_eq!(
            Hyperbolic::new(1.0, 0.1, 5.5),
            Err(DeclineError::ShapeOutOfRange { b: 5.5 })
        );
        assert!(Hyperbolic::new(1.0, 0.1, 5.0).is_ok());
        assert!(Hyperbolic::new(1.0, 0.1, 0.0).is_ok());
    }

    #[test]
    fn general_formula() {
        let model = Hyperbolic::new(1000.0, 0.5, 2.0).unwrap();
        // (1 + 2 * 0.5 * 3)^(-1/2) = 1/2
        assert_relative_eq!(model.rate(3.0), 500.0, max_relative = 1e-12);
        // 1000 / (-0.5) * (1 - 4^(1/2))
        assert_relative_eq!(model.cumulative(3.0), 2000.0, max_relative = 1e-12);
        assert_relative_eq!(model.d_at(3.0), 0.125, max_relative = 1e-12);
    }

    #[test]
    fn limits() {
        let d = nominal_from_tangent(0.95);
        let exponential = Exponential::new(1000.0, d).unwrap();
        let hyperbolic = Hyperbolic::new(1000.0, d, 0.0).unwrap();
        let harmonic = Hyperbolic::new(1000.0, d, 1.0).unwrap();
        for t in linspace(0.0, 10.0, 11) {
            assert_eq!(hyperbolic.rate(t), exponential.rate(t));
            assert_eq!(hyperbolic.cumulative(t), exponential.cumulative(t));
            assert_relative_eq!(harmonic.rate(t), 1000.0 / (1.0 + d * t));
            assert_relative_eq!(
                harmonic.cumulative(t),
                1000.0 / d * f64::ln(1.0 + d * t),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn continuous_across_branch_thresholds() {
        let d = 0.5;
        for (b_below, b_above) in [
            (0.5 * ZERO_B_EPS, 2.0 * ZERO_B_EPS),
            (1.0 - 0.5 * HARMONIC_EPS, 1.0 - 2.0 * HARMONIC_EPS),
            (1.0 + 0.5 * HARMONIC_EPS, 1.0 + 2.0 * HARMONIC_EPS),
        ] {
            let below = Hyperbolic::new(1000.0, d, b_below).unwrap();
            let above = Hyperbolic::new(1000.0, d, b_above).unwrap();
            for t in linspace(0.0, 5.0, 51) {
                assert_relative_eq!(below.rate(t), above.rate(t), max_relative = 1e-3);
                assert_relative_eq!(
                    below.cumulative(t),
                    above.cumulative(t),
                    max_relative = 1e-3
                );
            }
        }
    }

    #[test]
    fn zero_decline_is_flat() {
        for b in [0.0, 0.5, 1.0, 1.5] {
            let model = Hyperbolic::new(10.0, 0.0, b).unwrap();
            for t in [0.0, 1e3, f64::INFINITY] {
                assert_eq!(model.rate(t), 10.0);
                assert_eq!(model.d_at(t), 0.0);
            }
            assert_eq!(model.cumulative(1e3), 1e4);
        }
    }

    #[test]
    fn infinite_time() {
        let d = nominal_from_tangent(0.95);
        for b in [0.0, 0.5, 1.0, 1.5] {
            let model = Hyperbolic::new(1000.0, d, b).unwrap();
            assert_eq!(model.rate(f64::INFINITY), 0.0);
            assert!(!model.d_at(f64::INFINITY).is_nan());
        }
        assert_eq!(Hyperbolic::new(1000.0, d, 0.0).unwrap().d_at(f64::INFINITY), d);
    }

    #[test]
    fn cumulative_at_infinity() {
        let d = nominal_from_tangent(0.95);
        let converging = Hyperbolic::new(1000.0, d, 0.5).unwrap();
        assert_relative_eq!(
            converging.cumulative(f64::INFINITY),
            1000.0 / (0.5 * d),
            max_relative = 1e-12
        );
        for b in [1.0, 1.5] {
            let diverging = Hyperbolic::new(1000.0, d, b).unwrap();
            for t in [1e10, 1e300, f64::INFINITY] {
                let cumulative = diverging.cumulative(t);
                assert!(!cumulative.is_nan());
                assert!(cumulative > diverging.cumulative(1e3));
            }
        }
    }

    #[test]
    fn parameters() {
        let model = Hyperbolic::from_parameters(&[100.0, 0.3, 1.2]).unwrap();
        assert_eq!(model.parameters(), [100.0, 0.3, 1.2]);
        assert!(Hyperbolic::from_parameters(&[100.0, 0.3, 7.0]).is_err());
    }
}
