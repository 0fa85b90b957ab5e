//! Detection-history storage, validation, and pooling.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1};

use crate::design::SurveyDesign;
use crate::error::OccupancyError;

/// A rectangular matrix of per-site detection histories with site weights.
///
/// Each row holds one site's detection symbols (0 = observed absent,
/// 1 = observed present) flattened to `n_seasons * n_surveys` occasions in
/// season-major order. The weight of a row counts how many surveyed sites
/// share that exact history; freshly constructed matrices carry weight 1
/// per row, and [`HistoryMatrix::pool`] merges duplicates.
///
/// There is no missing-data symbol: every site is surveyed at every
/// occasion.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryMatrix {
    data: Array2<u8>,
    weights: Vec<u32>,
}

impl HistoryMatrix {
    /// Builds a matrix from per-site rows, each weighted 1.
    ///
    /// # Errors
    ///
    /// - [`OccupancyError::EmptyData`] if `rows` is empty.
    /// - [`OccupancyError::LengthMismatch`] if any row length differs from
    ///   `design.n_occasions()`.
    /// - [`OccupancyError::InvalidSymbol`] if any symbol is neither 0 nor 1.
    pub fn from_rows(rows: &[Vec<u8>], design: &SurveyDesign) -> Result<Self, OccupancyError> {
        let weights = vec![1; rows.len()];
        Self::from_weighted_rows(rows, &weights, design)
    }

    /// Builds a matrix from per-site rows with explicit weights.
    ///
    /// # Errors
    ///
    /// As [`HistoryMatrix::from_rows`], plus
    /// [`OccupancyError::WeightMismatch`] if the counts disagree and
    /// [`OccupancyError::ZeroWeight`] if any weight is zero.
    pub fn from_weighted_rows(
        rows: &[Vec<u8>],
        weights: &[u32],
        design: &SurveyDesign,
    ) -> Result<Self, OccupancyError> {
        if rows.is_empty() {
            return Err(OccupancyError::EmptyData);
        }
        if rows.len() != weights.len() {
            return Err(OccupancyError::WeightMismatch {
                histories: rows.len(),
                weights: weights.len(),
            });
        }

        let n_occasions = design.n_occasions();
        let mut flat = Vec::with_capacity(rows.len() * n_occasions);
        for (site, row) in rows.iter().enumerate() {
            if row.len() != n_occasions {
                return Err(OccupancyError::LengthMismatch {
                    site,
                    expected: n_occasions,
                    got: row.len(),
                });
            }
            for (occasion, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(OccupancyError::InvalidSymbol {
                        site,
                        occasion,
                        value,
                    });
                }
            }
            flat.extend_from_slice(row);
        }
        for (site, &w) in weights.iter().enumerate() {
            if w == 0 {
                return Err(OccupancyError::ZeroWeight { site });
            }
        }

        let data = Array2::from_shape_vec((rows.len(), n_occasions), flat)
            .expect("row lengths validated against the design");
        Ok(Self {
            data,
            weights: weights.to_vec(),
        })
    }

    /// Internal constructor for pre-validated storage.
    pub(crate) fn from_parts(data: Array2<u8>, weights: Vec<u32>) -> Self {
        debug_assert_eq!(data.nrows(), weights.len());
        Self { data, weights }
    }

    /// Merges identical histories, summing their weights.
    ///
    /// Row order of the result is lexicographic in the history symbols,
    /// so pooling is deterministic regardless of input order. The total
    /// weighted site count is preserved, and so is any likelihood computed
    /// over the matrix.
    pub fn pool(&self) -> Self {
        let mut pooled: BTreeMap<Vec<u8>, u32> = BTreeMap::new();
        for (row, &w) in self.data.rows().into_iter().zip(&self.weights) {
            *pooled.entry(row.to_vec()).or_insert(0) += w;
        }

        let n_occasions = self.n_occasions();
        let mut flat = Vec::with_capacity(pooled.len() * n_occasions);
        let mut weights = Vec::with_capacity(pooled.len());
        for (row, w) in pooled {
            flat.extend_from_slice(&row);
            weights.push(w);
        }
        let n_rows = weights.len();
        let data = Array2::from_shape_vec((n_rows, n_occasions), flat)
            .expect("pooled rows share the original row length");
        Self::from_parts(data, weights)
    }

    /// Returns the number of stored (distinct, if pooled) history rows.
    pub fn n_sites(&self) -> usize {
        self.data.nrows()
    }

    /// Returns the flattened history length.
    pub fn n_occasions(&self) -> usize {
        self.data.ncols()
    }

    /// Returns the total number of surveyed sites (weight sum).
    pub fn total_sites(&self) -> u64 {
        self.weights.iter().map(|&w| u64::from(w)).sum()
    }

    /// Returns the detection symbols of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn site(&self, i: usize) -> ArrayView1<'_, u8> {
        self.data.row(i)
    }

    /// Returns the weight of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn weight(&self, i: usize) -> u32 {
        self.weights[i]
    }

    /// Returns all site weights in row order.
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Iterates over `(history, weight)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, u8>, u32)> {
        self.data
            .rows()
            .into_iter()
            .zip(self.weights.iter().copied())
    }
}
