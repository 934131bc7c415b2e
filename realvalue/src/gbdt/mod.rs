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

//! Gradient-boosted regression trees.
//!
//! The ensemble starts from the mean target and adds one shrunken regression
//! tree per round, each fitted to the gradients of the loss at the current
//! predictions. Rows and features are subsampled per tree from a seeded RNG,
//! so a given seed always produces the same model.

pub mod sampling;
pub mod tree;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::{LossError, ModelError};
use crate::losses::{LossFunction, MSE};

use self::sampling::{ColumnSampler, RowSampler};
pub use self::tree::{RegressionTree, TreeParams};
use self::tree::TreeBuilder;

pub struct GradientBoostingBuilder {
    n_estimators: usize,
    learning_rate: f64,
    subsample: f64,
    colsample_bytree: f64,
    seed: u64,
    tree_params: TreeParams,
    loss_function: Box<dyn LossFunction>,
}

impl GradientBoostingBuilder {
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.tree_params.max_depth = max_depth;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn subsample(mut self, subsample: f64) -> Self {
        self.subsample = subsample;
        self
    }

    pub fn colsample_bytree(mut self, colsample_bytree: f64) -> Self {
        self.colsample_bytree = colsample_bytree;
        self
    }

    pub fn reg_lambda(mut self, reg_lambda: f64) -> Self {
        self.tree_params.reg_lambda = reg_lambda;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.tree_params.gamma = gamma;
        self
    }

    pub fn min_child_weight(mut self, min_child_weight: f64) -> Self {
        self.tree_params.min_child_weight = min_child_weight;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn loss_function(mut self, loss_function: impl LossFunction + 'static) -> Self {
        self.loss_function = Box::new(loss_function);
        self
    }

    pub fn build(self) -> GradientBoostingRegressor {
        GradientBoostingRegressor {
            n_estimators: self.n_estimators,
            learning_rate: self.learning_rate,
            subsample: self.subsample,
            colsample_bytree: self.colsample_bytree,
            seed: self.seed,
            tree_params: self.tree_params,
            loss_function: self.loss_function,
        }
    }
}

/// Untrained boosting configuration. [`fit`](Self::fit) produces a
/// [`FittedModel`] and leaves the regressor untouched, so one configuration can
/// train several models.
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    subsample: f64,
    colsample_bytree: f64,
    seed: u64,
    tree_params: TreeParams,
    loss_function: Box<dyn LossFunction>,
}

impl GradientBoostingRegressor {
    /// Starts a builder with 200 trees of depth 6, learning rate 0.05, 0.8 row
    /// and column subsampling, lambda 1 and seed 42.
    pub fn new() -> GradientBoostingBuilder {
        GradientBoostingBuilder {
            n_estimators: 200,
            learning_rate: 0.05,
            subsample: 0.8,
            colsample_bytree: 0.8,
            seed: 42,
            tree_params: TreeParams::default(),
            loss_function: Box::new(MSE),
        }
    }

    fn validate_params(&self) -> Result<(), ModelError> {
        let invalid = |name: &'static str, reason: &str| {
            Err(ModelError::InvalidParameter { name, reason: reason.to_string() })
        };

        if self.n_estimators == 0 {
            return invalid("n_estimators", "must be at least 1");
        }
        if self.tree_params.max_depth == 0 {
            return invalid("max_depth", "must be at least 1");
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid("learning_rate", "must be a positive finite number");
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return invalid("subsample", "must be in (0, 1]");
        }
        if !(self.colsample_bytree > 0.0 && self.colsample_bytree <= 1.0) {
            return invalid("colsample_bytree", "must be in (0, 1]");
        }
        if !(self.tree_params.reg_lambda >= 0.0) {
            return invalid("reg_lambda", "must be non-negative");
        }
        if !(self.tree_params.gamma >= 0.0) {
            return invalid("gamma", "must be non-negative");
        }
        if !(self.tree_params.min_child_weight >= 0.0) {
            return invalid("min_child_weight", "must be non-negative");
        }
        Ok(())
    }

    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<FittedModel, ModelError> {
        self.validate_params()?;

        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidNumericValue);
        }

        let (n_rows, n_features) = x.dim();
        let base_score = y.mean().ok_or(ModelError::EmptyInput)?;
        let mut predictions = Array1::from_elem(n_rows, base_score);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let row_sampler = RowSampler::new(self.subsample);
        let column_sampler = ColumnSampler::new(self.colsample_bytree);

        let mut gain_totals = vec![0.0; n_features];
        let mut split_counts = vec![0_usize; n_features];
        let mut trees = Vec::with_capacity(self.n_estimators);

        for round in 0..self.n_estimators {
            let (grad, hess) = self.loss_function.gradients(&predictions, y)?;
            let rows = row_sampler.sample(n_rows, &mut rng);
            let features = column_sampler.sample(n_features, &mut rng);

            let (tree, splits) =
                TreeBuilder::new(x, &grad, &hess, &features, &self.tree_params).build(rows);

            for split in splits {
                gain_totals[split.feature] += split.gain;
                split_counts[split.feature] += 1;
            }
            for (prediction, row) in predictions.iter_mut().zip(x.outer_iter()) {
                *prediction += self.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);

            if (round + 1) % 50 == 0 {
                let loss = self.calculate_loss(&predictions, y)?;
                debug!("Boosting round {}/{}: training loss {:.4}", round + 1, self.n_estimators, loss);
            }
        }

        Ok(FittedModel {
            base_score,
            learning_rate: self.learning_rate,
            trees,
            feature_importances: normalize_importances(&gain_totals, &split_counts),
        })
    }

    pub fn calculate_loss(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, LossError> {
        self.loss_function.calculate(predictions, actuals)
    }
}

/// Average gain per split for each feature, normalized to sum to one.
///
/// Features never used for a split get zero. If no split happened at all the
/// weight is spread evenly.
fn normalize_importances(gain_totals: &[f64], split_counts: &[usize]) -> Array1<f64> {
    let average: Array1<f64> = gain_totals
        .iter()
        .zip(split_counts)
        .map(|(&gain, &count)| if count == 0 { 0.0 } else { (gain / count as f64).max(0.0) })
        .collect();

    let total = average.sum();
    if total > 0.0 {
        average / total
    } else {
        Array1::from_elem(gain_totals.len(), 1.0 / gain_totals.len().max(1) as f64)
    }
}

/// A trained, immutable tree ensemble.
#[derive(Debug, Clone)]
pub struct FittedModel {
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    feature_importances: Array1<f64>,
}

impl FittedModel {
    pub fn n_features(&self) -> usize {
        self.feature_importances.len()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Global feature importance, one non-negative weight per feature, summing to one.
    pub fn feature_importances(&self) -> &Array1<f64> {
        &self.feature_importances
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidNumericValue);
        }
        Ok(x.outer_iter().map(|row| self.predict_row(row)).collect())
    }

    pub fn predict_one(&self, features: &Array1<f64>) -> Result<f64, ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidNumericValue);
        }
        Ok(self.predict_row(features.view()))
    }

    #[inline(always)]
    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        self.base_score + self.learning_rate * self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
    }
}
