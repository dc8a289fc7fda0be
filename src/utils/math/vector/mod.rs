pub mod math;

use std::fmt::{self, Debug};

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVecは0要素を疎とした疎ベクトルです
/// indices と values を持ち
/// indicesは要素のインデックスを保持し、
/// valuesは要素の値を保持します
///
/// 要素はindicesの昇順でソートされていることを保証します
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    inds: Vec<usize>,
    vals: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            len: 0,
        }
    }

    /// Zero vector of logical length `len`
    #[inline]
    pub fn zeros(len: usize) -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Duplicate indices are summed, zeros are dropped.
    /// `len` is raised to cover the largest index when needed.
    pub fn from_pairs(len: usize, pairs: impl IntoIterator<Item = (usize, N)>) -> Self {
        let mut pairs: Vec<(usize, N)> = pairs.into_iter().collect();
        // stable: 同じインデックスは出現順に加算
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut vec = ZeroSpVec::with_capacity(pairs.len());
        vec.len = len;
        for (idx, val) in pairs {
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vec.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => vec.raw_push(idx, val),
            }
        }
        vec.drop_zeros();
        if let Some(&last) = vec.inds.last() {
            vec.len = vec.len.max(last + 1);
        }
        vec
    }

    /// raw_pushは、要素を末尾に追加します
    /// indexは既存の最大インデックスより大きい必要があります
    #[inline]
    fn raw_push(&mut self, index: usize, value: N) {
        debug_assert!(self.inds.last().map_or(true, |&last| last < index));
        self.inds.push(index);
        self.vals.push(value);
    }

    #[inline]
    fn drop_zeros(&mut self) {
        let mut keep = 0;
        for i in 0..self.inds.len() {
            if self.vals[i] != N::zero() {
                self.inds[keep] = self.inds[i];
                self.vals[keep] = self.vals[i];
                keep += 1;
            }
        }
        self.inds.truncate(keep);
        self.vals.truncate(keep);
    }

    /// Append a value at logical position `len`
    #[inline]
    pub fn push(&mut self, elem: N) {
        if elem != N::zero() {
            let idx = self.len;
            self.raw_push(idx, elem);
        }
        self.len += 1;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&index) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Iterate over stored `(index, value)` pairs in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Apply `f` to every stored value, dropping results that become zero
    pub fn map_values(&self, mut f: impl FnMut(usize, N) -> N) -> Self {
        let mut out = ZeroSpVec::with_capacity(self.nnz());
        out.len = self.len;
        for (idx, val) in self.raw_iter() {
            out.raw_push(idx, f(idx, val));
        }
        out.drop_zeros();
        out
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> From<Vec<N>> for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn from(vec: Vec<N>) -> Self {
        let mut sp = ZeroSpVec::with_capacity(vec.len());
        for elem in vec {
            sp.push(elem);
        }
        sp
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "ZeroSpVec {{ len: {}, nnz: {}, ", self.len, self.nnz())?;
            f.debug_map().entries(self.raw_iter()).finish()?;
            write!(f, " }}")
        } else {
            f.debug_map().entries(self.raw_iter()).finish()
        }
    }
}
