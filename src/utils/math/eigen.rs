//! Symmetric eigen-decomposition (cyclic Jacobi).
//!
//! Small and dense only: the matrices seen here are document Gram matrices
//! of a single blog, so O(n^3) per sweep is fine and the result is fully
//! deterministic for a given input.

use crate::utils::sort::desc;

const MAX_SWEEPS: usize = 100;
const TOLERANCE: f64 = 1e-12;

/// Eigenpairs of a real symmetric matrix, sorted by eigenvalue descending.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// eigenvalues, descending
    pub values: Vec<f64>,
    /// `vectors[k]` is the unit eigenvector for `values[k]`
    pub vectors: Vec<Vec<f64>>,
}

impl SymmetricEigen {
    /// Decompose `matrix`, which must be square and symmetric.
    /// Only the upper triangle drives the rotations; asymmetry is not checked.
    pub fn new(matrix: &[Vec<f64>]) -> Self {
        let n = matrix.len();
        debug_assert!(matrix.iter().all(|row| row.len() == n), "matrix must be square");
        let mut a: Vec<Vec<f64>> = matrix.to_vec();
        let mut v = identity(n);

        let scale = frobenius(&a);
        if scale > 0.0 {
            for _ in 0..MAX_SWEEPS {
                if off_diagonal(&a).sqrt() <= TOLERANCE * scale {
                    break;
                }
                for p in 0..n {
                    for q in (p + 1)..n {
                        rotate(&mut a, &mut v, p, q);
                    }
                }
            }
        }

        // 固有値の降順, 同値は元の列順
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| desc(a[i][i], a[j][j]));

        let values = order.iter().map(|&k| a[k][k]).collect();
        let vectors = order
            .iter()
            .map(|&k| (0..n).map(|row| v[row][k]).collect())
            .collect();
        SymmetricEigen { values, vectors }
    }
}

/// One Jacobi rotation zeroing `a[p][q]`.
fn rotate(a: &mut [Vec<f64>], v: &mut [Vec<f64>], p: usize, q: usize) {
    let apq = a[p][q];
    if apq == 0.0 {
        return;
    }
    let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
    // smaller root of t^2 + 2θt - 1 = 0
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    let n = a.len();
    for k in 0..n {
        let akp = a[k][p];
        let akq = a[k][q];
        a[k][p] = c * akp - s * akq;
        a[k][q] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[p][k];
        let aqk = a[q][k];
        a[p][k] = c * apk - s * aqk;
        a[q][k] = s * apk + c * aqk;
    }
    for row in v.iter_mut() {
        let vkp = row[p];
        let vkq = row[q];
        row[p] = c * vkp - s * vkq;
        row[q] = s * vkp + c * vkq;
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

fn frobenius(a: &[Vec<f64>]) -> f64 {
    a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt()
}

fn off_diagonal(a: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    for (i, row) in a.iter().enumerate() {
        for x in row.iter().skip(i + 1) {
            sum += x * x;
        }
    }
    sum
}
