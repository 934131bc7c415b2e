// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Row and column subsampling applied once per boosting round.

use rand::Rng;
use rand::seq::index;

/// Bernoulli row sampling: every row is kept independently with probability `rate`.
#[derive(Debug, Clone, Copy)]
pub struct RowSampler {
    rate: f64,
}

impl RowSampler {
    pub fn new(rate: f64) -> Self {
        RowSampler { rate }
    }

    /// Returns the sorted indices of the selected rows. Falls back to every
    /// row when the draw happens to select nothing.
    pub fn sample<R: Rng>(&self, n_rows: usize, rng: &mut R) -> Vec<usize> {
        if self.rate >= 1.0 {
            return (0..n_rows).collect();
        }
        let rows: Vec<usize> = (0..n_rows).filter(|_| rng.gen_bool(self.rate)).collect();
        if rows.is_empty() { (0..n_rows).collect() } else { rows }
    }
}

/// Per-tree feature sampling without replacement.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSampler {
    rate: f64,
}

impl ColumnSampler {
    pub fn new(rate: f64) -> Self {
        ColumnSampler { rate }
    }

    /// Number of features kept out of `n_features`; always at least one.
    pub fn sample_size(&self, n_features: usize) -> usize {
        ((self.rate * n_features as f64).round() as usize).clamp(1, n_features.max(1))
    }

    /// Returns the sorted indices of the selected features.
    pub fn sample<R: Rng>(&self, n_features: usize, rng: &mut R) -> Vec<usize> {
        let k = self.sample_size(n_features);
        if k >= n_features {
            return (0..n_features).collect();
        }
        let mut features = index::sample(rng, n_features, k).into_vec();
        features.sort_unstable();
        features
    }
}
