use std::cmp::Ordering;

use num::Float;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Float,
{
    /// ドット積を計算するメソッド
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `N` - ドット積の結果
    #[inline]
    pub fn dot(&self, other: &Self) -> N {
        let mut a_it = self.raw_iter();
        let mut b_it = other.raw_iter();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut result = N::zero();
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    result = result + va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        result
    }

    /// Dot product against a dense vector; indices past its end count as zero
    #[inline]
    pub fn dot_dense(&self, dense: &[N]) -> N {
        self.raw_iter()
            .filter_map(|(idx, val)| dense.get(idx).map(|d| *d * val))
            .fold(N::zero(), |acc, x| acc + x)
    }

    #[inline]
    pub fn norm_sq(&self) -> N {
        self.raw_iter().fold(N::zero(), |acc, (_, v)| acc + v * v)
    }

    #[inline]
    pub fn norm(&self) -> N {
        self.norm_sq().sqrt()
    }

    /// L2 正規化したベクトルを返す
    /// ゼロベクトルはそのまま
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == N::zero() {
            return self.clone();
        }
        self.map_values(|_, v| v / norm)
    }
}

/// Dense dot product
#[inline]
pub fn dot<N: Float>(a: &[N], b: &[N]) -> N {
    a.iter().zip(b.iter()).fold(N::zero(), |acc, (x, y)| acc + *x * *y)
}

/// Dense L2 norm
#[inline]
pub fn norm<N: Float>(a: &[N]) -> N {
    dot(a, a).sqrt()
}

/// cos(θ) = A・B / (|A||B|)
/// Zero vectors score 0 against everything. The result is clamped to [-1, 1].
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // Zero division safety with f64::EPSILON
    (dot(a, b) / (norm_a * norm_b + f64::EPSILON)).clamp(-1.0, 1.0)
}
