//! Ordinary least squares with indicator-encoded categories
//!
//! The training sets are tiny (tens to low hundreds of rows), so the model is
//! fitted in closed form: features and target are centered, the centered Gram
//! matrix is eigendecomposed with cyclic Jacobi rotations, and the
//! minimum-norm solution is taken through its pseudo-inverse. Collinear
//! indicator blocks and constant columns therefore never fail the fit; they
//! simply receive no weight along their degenerate directions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Eigenvalues below this fraction of the largest one are treated as zero
const RANK_TOLERANCE: f64 = 1e-10;
const MAX_SWEEPS: usize = 100;

/// One-hot encoder for a categorical column.
///
/// Categories unseen during fitting encode to an all-zero block and so
/// contribute no category signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryEncoder {
    categories: Vec<String>,
}

impl CategoryEncoder {
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let categories: BTreeSet<&str> = values.into_iter().collect();
        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_known(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    fn index_of(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) {
        let start = out.len();
        out.resize(start + self.width(), 0.0);
        if let Some(idx) = self.index_of(value) {
            out[start + idx] = 1.0;
        }
    }
}

/// Fitted linear model `y = intercept + coefficients . x`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    /// Fit by least squares. Returns None when there are no rows, the rows
    /// disagree on width, or any value is not finite.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Option<Self> {
        let n = rows.len();
        if n == 0 || n != targets.len() {
            return None;
        }
        let p = rows[0].len();
        if rows.iter().any(|r| r.len() != p)
            || rows.iter().flatten().chain(targets).any(|v| !v.is_finite())
        {
            return None;
        }

        let x_mean: Vec<f64> = (0..p)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n as f64)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n as f64;

        let mut gram = vec![vec![0.0; p]; p];
        let mut moment = vec![0.0; p];
        for (row, y) in rows.iter().zip(targets) {
            let centered: Vec<f64> = row.iter().zip(&x_mean).map(|(x, m)| x - m).collect();
            let dy = y - y_mean;
            for i in 0..p {
                moment[i] += centered[i] * dy;
                for j in i..p {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
        }

        let coefficients = min_norm_solve(gram, &moment);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Some(Self {
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Minimum-norm solution of `gram . beta = moment` for a symmetric positive
/// semi-definite `gram`.
fn min_norm_solve(gram: Vec<Vec<f64>>, moment: &[f64]) -> Vec<f64> {
    let p = moment.len();
    let (eigenvalues, eigenvectors) = symmetric_eigen(gram);

    let largest = eigenvalues.iter().cloned().fold(0.0_f64, f64::max);
    let cutoff = largest * RANK_TOLERANCE;

    let mut beta = vec![0.0; p];
    if largest <= 0.0 {
        return beta;
    }
    for (i, &lambda) in eigenvalues.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        let projection: f64 = (0..p).map(|k| eigenvectors[k][i] * moment[k]).sum();
        let weight = projection / lambda;
        for (k, b) in beta.iter_mut().enumerate() {
            *b += weight * eigenvectors[k][i];
        }
    }
    beta
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
/// Returns the eigenvalues and a matrix whose columns are the eigenvectors.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v = vec![vec![0.0; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum::<f64>().max(f64::MIN_POSITIVE);

    for _ in 0..MAX_SWEEPS {
        let off_diagonal: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off_diagonal <= scale * 1e-24 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * (1.0 + b.abs())
    }

    #[test]
    fn test_encoder_sorts_and_dedups() {
        let encoder = CategoryEncoder::fit(["Wheat", "Rice", "Wheat"]);
        assert_eq!(encoder.categories(), &["Rice".to_string(), "Wheat".to_string()]);

        let mut out = vec![7.0];
        encoder.encode_into("Wheat", &mut out);
        assert_eq!(out, vec![7.0, 0.0, 1.0]);
    }

    #[test]
    fn test_encoder_unknown_is_all_zero() {
        let encoder = CategoryEncoder::fit(["Wheat", "Rice"]);
        let mut out = Vec::new();
        encoder.encode_into("Barley", &mut out);
        assert_eq!(out, vec![0.0, 0.0]);
        assert!(!encoder.is_known("Barley"));
    }

    #[test]
    fn test_fit_recovers_simple_line() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| 3.0 * i as f64 + 7.0).collect();
        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert!(close(model.coefficients[0], 3.0));
        assert!(close(model.intercept, 7.0));
        assert!(close(model.predict(&[20.0]), 67.0));
    }

    #[test]
    fn test_fit_recovers_two_features() {
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for a in 0..5 {
            for b in 0..4 {
                let (a, b) = (a as f64, (b * b) as f64);
                rows.push(vec![a, b]);
                targets.push(100.0 + 2.5 * a - 4.0 * b);
            }
        }
        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert!(close(model.coefficients[0], 2.5));
        assert!(close(model.coefficients[1], -4.0));
        assert!(close(model.intercept, 100.0));
    }

    #[test]
    fn test_collinear_indicators_get_min_norm_weights() {
        // Two indicator columns that always sum to one are collinear with the
        // intercept. The min-norm solution splits the effect symmetrically.
        let rows = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ];
        let targets = vec![10.0, 10.0, 20.0, 20.0];
        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert!(close(model.coefficients[0], -5.0));
        assert!(close(model.coefficients[1], 5.0));
        assert!(close(model.intercept, 15.0));
        // An all-zero block lands on the mean
        assert!(close(model.predict(&[0.0, 0.0]), 15.0));
    }

    #[test]
    fn test_constant_column_gets_no_weight() {
        let rows = vec![vec![6.0], vec![6.0], vec![6.0]];
        let targets = vec![1.0, 2.0, 3.0];
        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert_eq!(model.coefficients, vec![0.0]);
        assert!(close(model.intercept, 2.0));
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let model = LinearRegression::fit(&[vec![1.0, 30.0, 60.0]], &[2150.0]).unwrap();
        assert!(close(model.predict(&[1.0, 30.0, 60.0]), 2150.0));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(LinearRegression::fit(&[], &[]).is_none());
        assert!(LinearRegression::fit(&[vec![1.0]], &[1.0, 2.0]).is_none());
        assert!(LinearRegression::fit(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0]).is_none());
        assert!(LinearRegression::fit(&[vec![f64::NAN]], &[1.0]).is_none());
    }
}
