use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shape exponents below this value are treated as zero by the secant-effective conversions
pub const ZERO_B_EPS: f64 = 1e-5;

/// Convention used to express a decline rate
///
/// - [Nominal](DeclineRate::Nominal): continuous decay constant $D$
/// - [TangentEffective](DeclineRate::TangentEffective): $1 - e^{-D}$
/// - [SecantEffective](DeclineRate::SecantEffective): $1 - (1 + bD)^{-1/b}$, which tends to the
///   tangent-effective value as $b \to 0$
///
/// Effective rates are fractions per unit time and are expected to lie in $(0, 1)$, this is not
/// checked.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum DeclineRate {
    Nominal,
    TangentEffective,
    SecantEffective,
}

impl DeclineRate {
    /// Convert a decline rate given in this convention to the nominal one
    pub fn to_nominal(self, d: f64, b: f64) -> f64 {
        match self {
            Self::Nominal => d,
            Self::TangentEffective => -f64::ln_1p(-d),
            Self::SecantEffective if b < ZERO_B_EPS => Self::TangentEffective.to_nominal(d, b),
            Self::SecantEffective => (f64::powf(1.0 - d, -b) - 1.0) / b,
        }
    }

    /// Convert a nominal decline rate to this convention
    pub fn from_nominal(self, d: f64, b: f64) -> f64 {
        match self {
            Self::Nominal => d,
            Self::TangentEffective => -f64::exp_m1(-d),
            Self::SecantEffective if b < ZERO_B_EPS => Self::TangentEffective.from_nominal(d, b),
            Self::SecantEffective => 1.0 - f64::powf(1.0 + b * d, -1.0 / b),
        }
    }
}

/// Convert decline rate `d` from one convention to another
///
/// Nominal decline is used as the pivot for the two effective conventions. `b` is the shape
/// exponent and only matters for the secant-effective convention, `1.0` is a conventional value
/// for the other ones.
pub fn convert_decline(d: f64, from: DeclineRate, to: DeclineRate, b: f64) -> f64 {
    if from == to {
        return d;
    }
    to.from_nominal(from.to_nominal(d, b), b)
}

/// Nominal decline rate from decline `d` given in `from` convention
#[inline]
pub fn decline(d: f64, from: DeclineRate, b: f64) -> f64 {
    convert_decline(d, from, DeclineRate::Nominal, b)
}
