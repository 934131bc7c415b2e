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

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::errors::LossError;
use crate::losses::{LossFunction, MSE};

/// In-sample fit statistics captured once after training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub rmse: f64,
    pub r2: f64,
    pub samples: usize,
}

impl TrainingMetrics {
    pub fn evaluate(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<Self, LossError> {
        Ok(TrainingMetrics {
            rmse: rmse(predictions, actuals)?,
            r2: r2_score(predictions, actuals)?,
            samples: actuals.len(),
        })
    }
}

pub fn rmse(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<f64, LossError> {
    Ok(MSE.calculate(predictions, actuals)?.sqrt())
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Returns `0.0` when the actuals are constant.
pub fn r2_score(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<f64, LossError> {
    let mse = MSE.calculate(predictions, actuals)?;
    let mean = actuals.mean().ok_or(LossError::EmptyInput)?;
    let n = actuals.len() as f64;

    let ss_res = mse * n;
    let ss_tot = actuals.iter().map(|&y| (y - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}
