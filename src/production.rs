//! Production series preprocessing: peak alignment and type well aggregation

use crate::error::ProductionError;

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Index of the first maximum of the series, zero for an empty series
///
/// NaN values are ignored.
pub fn shift_to_peak(series: &[f64]) -> usize {
    series
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(i_max, max), (i, &x)| {
            if x > max { (i, x) } else { (i_max, max) }
        })
        .0
}

/// Tails of `major` and every tied series starting at the peak of `major`
///
/// Tied series are usually other phases of the same well, they are cut at the same index as
/// `major`. A tied series shorter than the shift gives an empty tail.
pub fn shift_to_peak_tied<'a>(major: &'a [f64], tied: &[&'a [f64]]) -> (&'a [f64], Vec<&'a [f64]>) {
    let shift = shift_to_peak(major);
    let tails = tied
        .iter()
        .map(|series| series.get(shift..).unwrap_or(&[]))
        .collect();
    (&major[shift..], tails)
}

/// Series without its trailing zeros
pub fn trim_trailing_zeros(series: &[f64]) -> &[f64] {
    let len = series
        .iter()
        .rposition(|&x| x != 0.0)
        .map_or(0, |i| i + 1);
    &series[..len]
}

/// Statistic used to combine production of several wells
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum Aggregation {
    Mean,
    /// Quantile of the given level in $[0, 1]$, linearly interpolated between order statistics
    Percentile(f64),
}

impl Aggregation {
    fn validate(self) -> Result<Self, ProductionError> {
        match self {
            Self::Percentile(p) if !(0.0..=1.0).contains(&p) => {
                Err(ProductionError::PercentileOutOfRange { p })
            }
            _ => Ok(self),
        }
    }

    fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Percentile(p) => {
                let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
                r5_quantile(&sorted, p)
            }
        }
    }
}

// R-5 from https://en.wikipedia.org/wiki/Quantile
fn r5_quantile(sorted: &[f64], p: f64) -> f64 {
    let h = sorted.len() as f64 * p - 0.5;
    let h_floor = h.floor();
    if h_floor < 0.0 {
        return sorted[0];
    }
    #[allow(clippy::cast_sign_loss)]
    let i = h_floor as usize;
    if i >= sorted.len() - 1 {
        sorted[sorted.len() - 1]
    } else {
        sorted[i] + (h - h_floor) * (sorted[i + 1] - sorted[i])
    }
}

/// Type well: production of several wells combined at every time index
///
/// Wells are usually [shifted to their peaks](shift_to_peak) first. Value `i` of the output
/// aggregates value `i` of every well having it. The output stops at the first index where fewer
/// than `min_wells` wells have data.
pub fn aggregate_production<W>(
    wells: &[W],
    min_wells: usize,
    aggregation: Aggregation,
) -> Result<Vec<f64>, ProductionError>
where
    W: AsRef<[f64]>,
{
    if wells.is_empty() {
        return Err(ProductionError::EmptySeries);
    }
    if min_wells == 0 {
        return Err(ProductionError::ZeroMinimumWells);
    }
    let aggregation = aggregation.validate()?;

    let mut type_well = vec![];
    let mut values = Vec::with_capacity(wells.len());
    for i in 0.. {
        values.clear();
        values.extend(wells.iter().filter_map(|well| well.as_ref().get(i).copied()));
        if values.len() < min_wells {
            break;
        }
        type_well.push(aggregation.apply(&values));
    }
    log::debug!(
        "aggregated {} wells into {} values",
        wells.len(),
        type_well.len()
    );
    Ok(type_well)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const OIL: [f64; 7] = [1000.0, 1200.0, 950.0, 750.0, 500.0, 100.0, 50.0];
    const GAS: [f64; 7] = [5000.0, 4000.0, 3000.0, 2000.0, 1000.0, 500.0, 250.0];

    fn wells() -> Vec<Vec<f64>> {
        vec![
            vec![4000.0, 3000.0, 2000.0, 1000.0, 500.0, 100.0],
            vec![1000.0, 750.0, 650.0, 500.0, 250.0, 50.0],
            vec![2500.0, 2000.0, 1250.0, 750.0, 500.0, 75.0],
        ]
    }

    #[test]
    fn peak() {
        assert_eq!(shift_to_peak(&OIL), 1);
        assert_eq!(shift_to_peak(&GAS), 0);
        assert_eq!(shift_to_peak(&[1.0, 3.0, 2.0, 3.0]), 1);
        assert_eq!(shift_to_peak(&[f64::NAN, 1.0]), 1);
        assert_eq!(shift_to_peak(&[]), 0);
    }

    #[test]
    fn tied_series_follow_major() {
        let (oil, tied) = shift_to_peak_tied(&OIL, &[&GAS[..], &GAS[..], &GAS[..1]]);
        assert_eq!(oil, &OIL[1..]);
        assert_eq!(tied[0], &GAS[1..]);
        assert_eq!(tied[0], tied[1]);
        assert!(tied[2].is_empty());
        assert_eq!(oil.first(), Some(&1200.0));
    }

    #[test]
    fn trailing_zeros() {
        assert_eq!(trim_trailing_zeros(&[3.0, 0.0, 2.0, 0.0, 0.0]), &[3.0, 0.0, 2.0]);
        assert_eq!(trim_trailing_zeros(&[0.0, 0.0]), &[] as &[f64]);
        assert_eq!(trim_trailing_zeros(&[1.0]), &[1.0]);
    }

    #[test]
    fn mean() {
        let type_well = aggregate_production(&wells(), 3, Aggregation::Mean).unwrap();
        let desired = [
            2500.0,
            5750.0 / 3.0,
            1300.0,
            750.0,
            1250.0 / 3.0,
            75.0,
        ];
        assert_eq!(type_well.len(), desired.len());
        for (actual, desired) in type_well.iter().zip(desired) {
            assert_relative_eq!(*actual, desired, max_relative = 1e-12);
        }
    }

    #[test]
    fn percentile() {
        let type_well = aggregate_production(&wells(), 3, Aggregation::Percentile(0.25)).unwrap();
        let desired = [1375.0, 1062.5, 800.0, 562.5, 312.5, 56.25];
        assert_eq!(type_well.len(), desired.len());
        for (actual, desired) in type_well.iter().zip(desired) {
            assert_relative_eq!(*actual, desired, max_relative = 1e-12);
        }

        let median = aggregate_production(&wells(), 1, Aggregation::Percentile(0.5)).unwrap();
        assert_eq!(median[0], 2500.0);
        let max = aggregate_production(&wells(), 1, Aggregation::Percentile(1.0)).unwrap();
        assert_eq!(max[0], 4000.0);
        let min = aggregate_production(&wells(), 1, Aggregation::Percentile(0.0)).unwrap();
        assert_eq!(min[0], 1000.0);
    }

    #[test]
    fn uneven_wells() {
        let wells: [&[f64]; 3] = [&[1.0, 2.0, 3.0], &[3.0, 4.0], &[5.0]];
        assert_eq!(
            aggregate_production(&wells, 2, Aggregation::Mean).unwrap(),
            [3.0, 3.0]
        );
        assert_eq!(
            aggregate_production(&wells, 1, Aggregation::Mean).unwrap(),
            [3.0, 3.0, 3.0]
        );
        assert!(
            aggregate_production(&wells, 4, Aggregation::Mean)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn invalid_arguments() {
        assert_eq!(
            aggregate_production::<Vec<f64>>(&[], 1, Aggregation::Mean),
            Err(ProductionError::EmptySeries)
        );
        assert_eq!(
            aggregate_production(&wells(), 0, Aggregation::Mean),
            Err(ProductionError::ZeroMinimumWells)
        );
        assert_eq!(
            aggregate_production(&wells(), 1, Aggregation::Percentile(1.5)),
            Err(ProductionError::PercentileOutOfRange { p: 1.5 })
        );
    }

    #[test]
    fn aggregation_serialization() {
        let aggregation = Aggregation::Percentile(0.9);
        let json = serde_json::to_string(&aggregation).unwrap();
        assert_eq!(json, r#"{"Percentile":0.9}"#);
        assert_eq!(
            serde_json::from_str::<Aggregation>(&json).unwrap(),
            aggregation
        );
    }
}
