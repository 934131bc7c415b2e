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

//! Startup training pipeline and the immutable state it produces.

use log::info;

use crate::data::{HousingRecord, SyntheticHousing, split_targets};
use crate::errors::{ModelError, TrainingError};
use crate::features::{self, Feature};
use crate::gbdt::{FittedModel, GradientBoostingRegressor};
use crate::metrics::TrainingMetrics;
use crate::preprocessing::{FittedPreprocessor, Preprocessor};

/// Dataset size, seed and boosting hyperparameters for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub n_samples: usize,
    pub seed: u64,
    pub n_estimators: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub subsample: f64,
    pub colsample_bytree: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            n_samples: 1000,
            seed: 42,
            n_estimators: 200,
            max_depth: 6,
            learning_rate: 0.05,
            subsample: 0.8,
            colsample_bytree: 0.8,
        }
    }
}

impl TrainingConfig {
    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    fn regressor(&self) -> GradientBoostingRegressor {
        GradientBoostingRegressor::new()
            .n_estimators(self.n_estimators)
            .max_depth(self.max_depth)
            .learning_rate(self.learning_rate)
            .subsample(self.subsample)
            .colsample_bytree(self.colsample_bytree)
            .seed(self.seed)
            .build()
    }
}

/// Everything a prediction needs: the fitted preprocessor, the fitted model
/// and the in-sample metrics measured right after training.
///
/// Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    preprocessor: FittedPreprocessor,
    model: FittedModel,
    metrics: TrainingMetrics,
}

impl TrainingSession {
    /// Generates the synthetic dataset, fits the preprocessor and the model,
    /// and measures training error.
    pub fn train(config: &TrainingConfig) -> Result<Self, TrainingError> {
        info!("Generating {} synthetic housing records (seed {})", config.n_samples, config.seed);
        let dataset =
            SyntheticHousing::new().with_samples(config.n_samples).with_seed(config.seed).generate()?;
        let (records, targets) = split_targets(&dataset);

        let (preprocessor, x) = Preprocessor::new().fit_transform(&records)?;
        let model = config.regressor().fit(&x, &targets)?;

        let predictions = model.predict(&x)?;
        let metrics = TrainingMetrics::evaluate(&predictions, &targets).map_err(ModelError::from)?;
        info!("Model trained! RMSE: {:.0}, R²: {:.4}", metrics.rmse, metrics.r2);

        Ok(TrainingSession { preprocessor, model, metrics })
    }

    pub fn preprocessor(&self) -> &FittedPreprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn metrics(&self) -> TrainingMetrics {
        self.metrics
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        features::feature_names()
    }

    /// Feature importances paired with their features, in schema order.
    pub fn importances(&self) -> Vec<(Feature, f64)> {
        Feature::ALL.iter().copied().zip(self.model.feature_importances().iter().copied()).collect()
    }

    /// Point estimate of the sale price of one house.
    pub fn predict(&self, record: &HousingRecord) -> Result<f64, ModelError> {
        let row = self.preprocessor.transform(record)?;
        self.model.predict_one(&row)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// Small session shared by every test that needs a trained model.
    pub(crate) fn trained_session() -> &'static TrainingSession {
        static SESSION: OnceLock<TrainingSession> = OnceLock::new();
        SESSION.get_or_init(|| {
            let config = TrainingConfig::default().with_samples(300).with_estimators(60);
            TrainingSession::train(&config).unwrap()
        })
    }

    fn waterfront() -> HousingRecord {
        HousingRecord {
            neighborhood: "Waterfront".to_string(),
            year_built: 2015,
            sqft: 3200,
            bedrooms: 4,
            bathrooms: 3.5,
            overall_quality: 9,
            garage_area: 600,
            has_pool: true,
            has_basement: true,
            condition: "Excellent".to_string(),
        }
    }

    #[test]
    fn test_train_reports_metrics() {
        let session = trained_session();
        let metrics = session.metrics();

        assert_eq!(metrics.samples, 300);
        assert!(metrics.rmse.is_finite() && metrics.rmse > 0.0);
        assert!(metrics.r2 > 0.5, "r2 too low: {}", metrics.r2);
        assert_eq!(session.model().n_trees(), 60);
        assert_eq!(session.feature_names().len(), Feature::COUNT);
    }

    #[test]
    fn test_importances_follow_schema() {
        let importances = trained_session().importances();
        assert_eq!(importances.len(), Feature::COUNT);
        assert_eq!(importances[0].0, Feature::ALL[0]);
        let total: f64 = importances.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_rich_house_above_floor() {
        let price = trained_session().predict(&waterfront()).unwrap();
        assert!(price > 25_000_000.0, "unexpected price {}", price);
    }

    #[test]
    fn test_predict_unknown_categories() {
        let mut record = waterfront();
        record.neighborhood = "Atlantis".to_string();
        record.condition = "Pristine".to_string();
        assert!(trained_session().predict(&record).is_ok());
    }

    #[test]
    fn test_train_zero_samples() {
        let config = TrainingConfig::default().with_samples(0);
        let result = TrainingSession::train(&config);
        assert!(matches!(result, Err(TrainingError::Data(_))));
    }

    #[test]
    fn test_train_invalid_model_params() {
        let config = TrainingConfig::default().with_samples(20).with_estimators(0);
        let result = TrainingSession::train(&config);
        assert!(matches!(result, Err(TrainingError::Model(ModelError::InvalidParameter { .. }))));
    }
}
