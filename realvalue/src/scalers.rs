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

use ndarray::{Array1, Array2, Axis};
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};

use crate::errors::ScalerError;

pub trait Scaler<T: Float> {
    fn fit(&mut self, x: &Array2<T>) -> Result<(), ScalerError>;

    fn transform(&self, x: &Array2<T>) -> Result<Array2<T>, ScalerError>;

    fn inverse_transform(&self, x: &Array2<T>) -> Result<Array2<T>, ScalerError>;

    fn fit_transform(&mut self, x: &Array2<T>) -> Result<Array2<T>, ScalerError> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Per-column statistics captured when a scaler is fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats<T> {
    pub mean: Array1<T>,
    /// Population standard deviation, with zero replaced by one.
    pub std: Array1<T>,
    pub min: Array1<T>,
    pub max: Array1<T>,
}

/// Standardizes columns to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant columns get a standard
/// deviation of one so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler<T: Float> {
    stats: Option<ColumnStats<T>>,
}

impl<T: Float + FromPrimitive> Default for StandardScaler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + FromPrimitive> StandardScaler<T> {
    pub fn new() -> Self {
        StandardScaler { stats: None }
    }

    pub fn stats(&self) -> Option<&ColumnStats<T>> {
        self.stats.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }

    fn fitted_stats(&self, x: &Array2<T>) -> Result<&ColumnStats<T>, ScalerError> {
        let stats = self.stats.as_ref().ok_or(ScalerError::NotFitted)?;
        if x.ncols() != stats.mean.len() {
            return Err(ScalerError::DimensionMismatch {
                expected: stats.mean.len(),
                actual: x.ncols(),
            });
        }
        Ok(stats)
    }
}

impl<T: Float + FromPrimitive> Scaler<T> for StandardScaler<T> {
    fn fit(&mut self, x: &Array2<T>) -> Result<(), ScalerError> {
        if x.ncols() == 0 {
            return Err(ScalerError::NoFeatures);
        }
        if x.nrows() == 0 {
            return Err(ScalerError::EmptyInput);
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ScalerError::InvalidNumericValue);
        }

        let mean = x.mean_axis(Axis(0)).ok_or(ScalerError::EmptyInput)?;
        let std = x.std_axis(Axis(0), T::zero()).mapv(|s| if s == T::zero() { T::one() } else { s });
        let min = x.fold_axis(Axis(0), T::infinity(), |&acc, &v| acc.min(v));
        let max = x.fold_axis(Axis(0), T::neg_infinity(), |&acc, &v| acc.max(v));

        self.stats = Some(ColumnStats { mean, std, min, max });
        Ok(())
    }

    fn transform(&self, x: &Array2<T>) -> Result<Array2<T>, ScalerError> {
        let stats = self.fitted_stats(x)?;
        Ok((x - &stats.mean) / &stats.std)
    }

    fn inverse_transform(&self, x: &Array2<T>) -> Result<Array2<T>, ScalerError> {
        let stats = self.fitted_stats(x)?;
        Ok(x * &stats.std + &stats.mean)
    }
}
