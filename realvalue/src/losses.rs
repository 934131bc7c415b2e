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

use crate::errors::LossError;

pub trait LossFunction: Send + Sync {
    fn calculate(&self, predictions: &Array1<f64>, actuals: &Array1<f64>)
    -> Result<f64, LossError>;

    /// First and second derivatives of the loss with respect to each prediction.
    fn gradients(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>), LossError>;
}

fn validate(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<(), LossError> {
    if predictions.is_empty() || actuals.is_empty() {
        return Err(LossError::EmptyInput);
    }

    if predictions.len() != actuals.len() {
        return Err(LossError::DimensionMismatch {
            expected: predictions.len(),
            actual: actuals.len(),
        });
    }

    if predictions.iter().any(|&v| !v.is_finite()) || actuals.iter().any(|&v| !v.is_finite()) {
        return Err(LossError::InvalidNumericValue);
    }
    Ok(())
}

/// Squared error. `calculate` reports the mean; the gradients are those of
/// `0.5 * (pred - y)^2`, matching the usual boosting objective.
pub struct MSE;

impl LossFunction for MSE {
    fn calculate(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, LossError> {
        validate(predictions, actuals)?;

        let diff = predictions - actuals;
        let mse = diff.mapv(|x| x * x).mean().ok_or(LossError::EmptyInput)?;
        Ok(mse)
    }

    fn gradients(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>), LossError> {
        validate(predictions, actuals)?;

        let grad = predictions - actuals;
        let hess = Array1::ones(predictions.len());
        Ok((grad, hess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn test_mse_empty_input() {
        let loss = MSE;
        let predictions: Array1<f64> = Array1::zeros(0);
        let actuals = array![1.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::EmptyInput)));
    }

    #[test]
    fn test_mse_dimension_mismatch() {
        let loss = MSE;
        let predictions = array![1.0, 2.0];
        let actuals = array![1.0, 2.0, 3.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn test_mse_invalid_numeric_value() {
        let loss = MSE;
        let predictions = array![1.0, f64::NAN];
        let actuals = array![1.0, 2.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::InvalidNumericValue)));
    }

    #[test]
    fn test_mse_valid_computation() {
        let loss = MSE;
        let predictions = array![1.0, 2.0, 3.0];
        let actuals = array![1.1, 2.1, 3.1];
        let mse = loss.calculate(&predictions, &actuals).unwrap();
        assert!((mse - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_mse_gradients() {
        let loss = MSE;
        let predictions = array![3.0, 0.5, -1.0];
        let actuals = array![1.0, 1.5, -1.0];
        let (grad, hess) = loss.gradients(&predictions, &actuals).unwrap();
        assert_eq!(grad, array![2.0, -1.0, 0.0]);
        assert_eq!(hess, array![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mse_gradients_dimension_mismatch() {
        let loss = MSE;
        let result = loss.gradients(&array![1.0], &array![1.0, 2.0]);
        assert!(matches!(result, Err(LossError::DimensionMismatch { expected: 1, actual: 2 })));
    }
}
