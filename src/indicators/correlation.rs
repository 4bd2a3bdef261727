// =============================================================================
// Peer Correlation Matrix — pairwise Pearson over aligned returns
// =============================================================================
//
// Each pair of symbols is aligned independently by an inner join on
// timestamp: only instants present in both return series (with finite values
// on both sides) take part. A pair needs at least two common observations and
// non-zero variance on both sides, otherwise its entry is NaN. Variance counts
// as zero when it is within rounding of the sample's sum of squares.
//
// Every unordered pair is computed once and mirrored, so the matrix is
// symmetric by construction. The diagonal is fixed at 1.0.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::series::TimedReturn;

/// Minimum aligned observations for a defined coefficient.
const MIN_COMMON_OBSERVATIONS: usize = 2;

/// Symmetric symbol x symbol correlation table.
///
/// Symbols are kept in lexicographic order; `values` is row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Coefficient for `(a, b)`, or `None` if either symbol is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[i * self.symbols.len() + j])
    }

    fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols
            .binary_search_by(|s| s.as_str().cmp(symbol))
            .ok()
    }
}

/// Build the correlation matrix for the given per-symbol return series.
pub fn compute_correlation_matrix(
    returns_by_symbol: &BTreeMap<String, Vec<TimedReturn>>,
) -> CorrelationMatrix {
    let symbols: Vec<String> = returns_by_symbol.keys().cloned().collect();
    let n = symbols.len();
    let mut values = vec![f64::NAN; n * n];

    // Timestamp lookups built once per symbol.
    let lookups: Vec<HashMap<DateTime<Utc>, f64>> = returns_by_symbol
        .values()
        .map(|series| {
            series
                .iter()
                .filter(|r| r.value.is_finite())
                .map(|r| (r.timestamp, r.value))
                .collect()
        })
        .collect();
    let series: Vec<&Vec<TimedReturn>> = returns_by_symbol.values().collect();

    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = series[i]
                .iter()
                .filter(|r| r.value.is_finite())
                .filter_map(|r| lookups[j].get(&r.timestamp).map(|&y| (r.value, y)))
                .unzip();

            let rho = pearson(&xs, &ys);
            trace!(
                a = %symbols[i],
                b = %symbols[j],
                common = xs.len(),
                rho,
                "pair correlated"
            );
            values[i * n + j] = rho;
            values[j * n + i] = rho;
        }
    }

    CorrelationMatrix { symbols, values }
}

/// Pearson correlation of two equally long samples.
///
/// Returns NaN for fewer than two observations, mismatched lengths, or a
/// zero-variance side (constant samples leave a rounding residue in the
/// mean, so the check is relative). The result is clamped to [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < MIN_COMMON_OBSERVATIONS {
        return f64::NAN;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0_f64, 0.0_f64, 0.0_f64);
    let (mut sum_sq_x, mut sum_sq_y) = (0.0_f64, 0.0_f64);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
        sum_sq_x += x * x;
        sum_sq_y += y * y;
    }

    if sxx <= f64::EPSILON * sum_sq_x || syy <= f64::EPSILON * sum_sq_y {
        return f64::NAN;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::ts;

    fn timed(values: &[f64]) -> Vec<TimedReturn> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimedReturn {
                timestamp: ts(i as i64),
                value: v,
            })
            .collect()
    }

    fn input(pairs: &[(&str, Vec<TimedReturn>)]) -> BTreeMap<String, Vec<TimedReturn>> {
        pairs
            .iter()
            .map(|(s, r)| (s.to_string(), r.clone()))
            .collect()
    }

    #[test]
    fn identical_returns_correlate_perfectly() {
        let r = timed(&[0.01, -0.02, 0.015, 0.003]);
        let m = compute_correlation_matrix(&input(&[("SPY", r.clone()), ("VOO", r)]));
        assert!((m.get("SPY", "VOO").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_returns_correlate_negatively() {
        let a = [0.01, -0.02, 0.015, 0.003];
        let b: Vec<f64> = a.iter().map(|x| -x).collect();
        let m = compute_correlation_matrix(&input(&[("SH", timed(&b)), ("SPY", timed(&a))]));
        assert!((m.get("SPY", "SH").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = compute_correlation_matrix(&input(&[
            ("AAA", timed(&[0.01, 0.02, -0.01, 0.00, 0.03])),
            ("BBB", timed(&[0.02, -0.01, 0.00, 0.01, 0.01])),
            ("CCC", timed(&[-0.01, 0.01, 0.02, -0.02, 0.00])),
        ]));
        assert_eq!(m.len(), 3);
        for a in m.symbols() {
            assert_eq!(m.get(a, a), Some(1.0));
            for b in m.symbols() {
                let ab = m.get(a, b).unwrap();
                let ba = m.get(b, a).unwrap();
                assert_eq!(ab.to_bits(), ba.to_bits());
                assert!((-1.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn pairs_are_aligned_on_common_timestamps() {
        // BBB is missing minute 1; the remaining instants match AAA exactly.
        let a = timed(&[0.01, 0.50, -0.02, 0.03]);
        let b = vec![a[0], a[2], a[3]];
        let m = compute_correlation_matrix(&input(&[("AAA", a), ("BBB", b)]));
        assert!((m.get("AAA", "BBB").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_common_observations_is_nan() {
        let a = timed(&[0.01, 0.02]);
        let b = vec![TimedReturn {
            timestamp: ts(1),
            value: 0.05,
        }];
        let m = compute_correlation_matrix(&input(&[("AAA", a), ("BBB", b)]));
        assert!(m.get("AAA", "BBB").unwrap().is_nan());
        assert_eq!(m.get("BBB", "BBB"), Some(1.0));
    }

    #[test]
    fn zero_variance_side_is_nan() {
        let m = compute_correlation_matrix(&input(&[
            ("AAA", timed(&[0.0, 0.0, 0.0])),
            ("BBB", timed(&[0.01, 0.02, 0.03])),
        ]));
        assert!(m.get("AAA", "BBB").unwrap().is_nan());
    }

    #[test]
    fn constant_non_zero_returns_are_nan() {
        // 0.1 * 3 / 3 is not exactly 0.1, so the deviations are tiny but non-zero.
        assert!(pearson(&[0.1, 0.1, 0.1], &[0.01, 0.02, 0.03]).is_nan());
        assert!(pearson(&[0.01, 0.02, 0.03], &[0.07; 3]).is_nan());
        let m = compute_correlation_matrix(&input(&[
            ("AAA", timed(&[0.1, 0.1, 0.1])),
            ("BBB", timed(&[0.01, 0.02, 0.03])),
        ]));
        assert!(m.get("AAA", "BBB").unwrap().is_nan());
    }

    #[test]
    fn small_but_real_variance_is_kept() {
        let rho = pearson(&[0.0100, 0.0101, 0.0102], &[0.0200, 0.0202, 0.0204]);
        assert!((rho - 1.0).abs() < 1e-9, "got {rho}");
    }

    #[test]
    fn non_finite_returns_are_left_out_of_the_join() {
        // AAA has no usable return at minute 1 (e.g. after a zero price);
        // the other instants match BBB exactly.
        let a = timed(&[0.01, f64::NAN, -0.02, 0.03]);
        let b = timed(&[0.01, 0.50, -0.02, 0.03]);
        let m = compute_correlation_matrix(&input(&[("AAA", a), ("BBB", b.clone())]));
        assert!((m.get("AAA", "BBB").unwrap() - 1.0).abs() < 1e-12);

        // Same when the NaN sits on the other side of the pair.
        let c = timed(&[0.01, f64::INFINITY, -0.02, 0.03]);
        let m = compute_correlation_matrix(&input(&[("BBB", b), ("CCC", c)]));
        assert!((m.get("CCC", "BBB").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nan_return_from_zero_price_series() {
        use crate::series::{test_support::points, Series};

        let a = Series::new("AAA", points("AAA", &[0.0, 10.0, 11.0, 10.0, 12.0])).unwrap();
        let b = Series::new("BBB", points("BBB", &[5.0, 9.0, 9.9, 9.0, 10.8])).unwrap();
        let ra = a.returns();
        assert!(ra[0].value.is_nan());
        let m = compute_correlation_matrix(&input(&[("AAA", ra), ("BBB", b.returns())]));
        // Remaining three instants carry identical returns on both sides.
        assert!((m.get("AAA", "BBB").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_symbol_lookup() {
        let m = compute_correlation_matrix(&input(&[("AAA", timed(&[0.1, 0.2]))]));
        assert_eq!(m.get("AAA", "ZZZ"), None);
        assert_eq!(m.get("AAA", "AAA"), Some(1.0));
    }

    #[test]
    fn empty_input_gives_empty_matrix() {
        let m = compute_correlation_matrix(&BTreeMap::new());
        assert!(m.is_empty());
    }
}
