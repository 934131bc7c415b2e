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

//! Turning a JSON request body into a priced, explained estimate.
//!
//! The confidence score and the interval band are fixed placeholders. They
//! are not derived from the model and must not be read as calibrated
//! uncertainty.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::HousingRecord;
use crate::errors::PredictionError;
use crate::features::Feature;
use crate::metrics::TrainingMetrics;
use crate::session::TrainingSession;

/// Fields a request must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "neighborhood",
    "year_built",
    "sqft",
    "bedrooms",
    "bathrooms",
    "overall_quality",
    "garage_area",
    "has_pool",
    "has_basement",
    "condition",
];

pub const CONFIDENCE: f64 = 0.92;
pub const INTERVAL_BAND: f64 = 0.12;
pub const TOP_FEATURES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub importance: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub predicted_price: f64,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub feature_importance: Vec<FeatureContribution>,
    pub model_performance: TrainingMetrics,
    pub timestamp: String,
}

impl PricePrediction {
    /// Wraps a raw point estimate with the interval, the top features and the
    /// training metrics.
    pub fn from_estimate(
        price: f64,
        importances: &[(Feature, f64)],
        metrics: TrainingMetrics,
    ) -> Self {
        PricePrediction {
            predicted_price: round2(price),
            confidence: CONFIDENCE,
            confidence_interval: ConfidenceInterval {
                lower: round2(price * (1.0 - INTERVAL_BAND)),
                upper: round2(price * (1.0 + INTERVAL_BAND)),
            },
            feature_importance: top_contributions(price, importances, TOP_FEATURES),
            model_performance: metrics,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Validates and prices one request body.
///
/// Every required field is checked for presence before any value is parsed,
/// so a missing field is reported even when another field is malformed.
pub fn predict(
    session: &TrainingSession,
    body: &Map<String, Value>,
) -> Result<PricePrediction, PredictionError> {
    let record = parse_record(body)?;
    let price = session.predict(&record)?;
    info!("Prediction made: ${:.0}", price);
    Ok(PricePrediction::from_estimate(price, &session.importances(), session.metrics()))
}

pub fn parse_record(body: &Map<String, Value>) -> Result<HousingRecord, PredictionError> {
    if let Some(&missing) = REQUIRED_FIELDS.iter().find(|&&field| !body.contains_key(field)) {
        return Err(PredictionError::MissingField(missing));
    }

    Ok(HousingRecord {
        neighborhood: label(body, "neighborhood")?,
        year_built: integer(body, "year_built")?,
        sqft: integer(body, "sqft")?,
        bedrooms: integer(body, "bedrooms")?,
        bathrooms: number(body, "bathrooms")?,
        overall_quality: integer(body, "overall_quality")?,
        garage_area: integer(body, "garage_area")?,
        has_pool: flag(body, "has_pool")?,
        has_basement: flag(body, "has_basement")?,
        condition: label(body, "condition")?,
    })
}

fn field<'a>(body: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, PredictionError> {
    body.get(name).ok_or(PredictionError::MissingField(name))
}

fn malformed(name: &'static str, expected: &str, value: &Value) -> PredictionError {
    PredictionError::Malformed { field: name, reason: format!("expected {}, got {}", expected, value) }
}

fn number(body: &Map<String, Value>, name: &'static str) -> Result<f64, PredictionError> {
    let value = field(body, name)?;
    value.as_f64().ok_or_else(|| malformed(name, "a number", value))
}

fn integer(body: &Map<String, Value>, name: &'static str) -> Result<i64, PredictionError> {
    let value = field(body, name)?;
    match value.as_i64() {
        Some(v) => Ok(v),
        None => value.as_f64().map(|v| v.trunc() as i64).ok_or_else(|| malformed(name, "a number", value)),
    }
}

fn flag(body: &Map<String, Value>, name: &'static str) -> Result<bool, PredictionError> {
    let value = field(body, name)?;
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => n
            .as_f64()
            .map(|v| v.trunc() != 0.0)
            .ok_or_else(|| malformed(name, "a boolean or number", value)),
        _ => Err(malformed(name, "a boolean or number", value)),
    }
}

fn label(body: &Map<String, Value>, name: &'static str) -> Result<String, PredictionError> {
    let value = field(body, name)?;
    value.as_str().map(str::to_string).ok_or_else(|| malformed(name, "a string", value))
}

/// The `n` most important features, heaviest first. Among equal weights the
/// feature later in the schema comes first.
pub fn top_contributions(
    price: f64,
    importances: &[(Feature, f64)],
    n: usize,
) -> Vec<FeatureContribution> {
    let total: f64 = importances.iter().map(|(_, w)| w).sum();

    let mut ranked: Vec<&(Feature, f64)> = importances.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.index().cmp(&a.0.index())));

    ranked
        .into_iter()
        .take(n)
        .map(|&(feature, importance)| FeatureContribution {
            feature: feature.name().to_string(),
            importance,
            contribution: if total > 0.0 { price * importance / total } else { 0.0 },
        })
        .collect()
}

#[inline(always)]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TrainingConfig;
    use crate::session::tests::trained_session;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    fn waterfront() -> Map<String, Value> {
        body(json!({
            "neighborhood": "Waterfront",
            "year_built": 2015,
            "sqft": 3200,
            "bedrooms": 4,
            "bathrooms": 3.5,
            "overall_quality": 9,
            "garage_area": 600,
            "has_pool": true,
            "has_basement": true,
            "condition": "Excellent"
        }))
    }

    #[test]
    fn test_parse_record() {
        let record = parse_record(&waterfront()).unwrap();
        assert_eq!(record.neighborhood, "Waterfront");
        assert_eq!(record.sqft, 3200);
        assert_eq!(record.bathrooms, 3.5);
        assert!(record.has_pool);
        assert_eq!(record.condition, "Excellent");
    }

    #[test]
    fn test_parse_record_lenient_numbers() {
        let mut request = waterfront();
        request.insert("sqft".to_string(), json!(1999.9));
        request.insert("has_pool".to_string(), json!(0));
        request.insert("has_basement".to_string(), json!(2.7));

        let record = parse_record(&request).unwrap();
        assert_eq!(record.sqft, 1999);
        assert!(!record.has_pool);
        assert!(record.has_basement);
    }

    #[test]
    fn test_missing_field_is_reported_in_order() {
        let mut request = waterfront();
        request.remove("sqft");
        request.remove("condition");

        let err = parse_record(&request).unwrap_err();
        assert!(matches!(err, PredictionError::MissingField("sqft")));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Missing field: sqft");
    }

    #[test]
    fn test_missing_field_wins_over_malformed() {
        let mut request = waterfront();
        request.insert("year_built".to_string(), json!("old"));
        request.remove("condition");

        let err = parse_record(&request).unwrap_err();
        assert!(matches!(err, PredictionError::MissingField("condition")));
    }

    #[test]
    fn test_malformed_values() {
        for (name, value) in [
            ("year_built", json!("1999")),
            ("bathrooms", Value::Null),
            ("has_pool", json!("yes")),
            ("neighborhood", json!(4)),
        ] {
            let mut request = waterfront();
            request.insert(name.to_string(), value);
            let err = parse_record(&request).unwrap_err();
            assert!(matches!(err, PredictionError::Malformed { field, .. } if field == name));
            assert!(!err.is_validation());
        }
    }

    #[test]
    fn test_top_contributions() {
        let importances = [
            (Feature::YearBuilt, 0.1),
            (Feature::Sqft, 0.4),
            (Feature::Bedrooms, 0.1),
            (Feature::Bathrooms, 0.05),
            (Feature::OverallQuality, 0.2),
            (Feature::GarageArea, 0.15),
        ];
        let top = top_contributions(1000.0, &importances, 5);

        let names: Vec<&str> = top.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(names, ["sqft", "overall_quality", "garage_area", "bedrooms", "year_built"]);
        assert!((top[0].contribution - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_waterfront_prediction() {
        let session = trained_session();
        let prediction = predict(session, &waterfront()).unwrap();
        let price = prediction.predicted_price;

        assert!(price > 25_000_000.0, "unexpected price {}", price);
        assert_eq!(prediction.confidence, 0.92);
        assert!((prediction.confidence_interval.lower - price * 0.88).abs() < 0.02);
        assert!((prediction.confidence_interval.upper - price * 1.12).abs() < 0.02);
        assert_eq!(prediction.model_performance, session.metrics());
        assert!(chrono::DateTime::parse_from_rfc3339(&prediction.timestamp).is_ok());
    }

    #[test]
    fn test_premium_house_with_default_training() {
        let session = TrainingSession::train(&TrainingConfig::default()).unwrap();
        let request = body(json!({
            "neighborhood": "Waterfront",
            "year_built": 2020,
            "sqft": 2500,
            "bedrooms": 4,
            "bathrooms": 3,
            "overall_quality": 9,
            "garage_area": 600,
            "has_pool": 1,
            "has_basement": 1,
            "condition": "Excellent"
        }));

        let prediction = predict(&session, &request).unwrap();
        let price = prediction.predicted_price;

        // Roughly 90M for this house; the floor is 2.5M
        assert!(price > 25_000_000.0, "unexpected price {}", price);
        assert_eq!(prediction.confidence, 0.92);
        assert!((prediction.confidence_interval.lower - price * 0.88).abs() < 0.02);
        assert!((prediction.confidence_interval.upper - price * 1.12).abs() < 0.02);

        let total: f64 = session.importances().iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(prediction.model_performance.samples, 1000);
    }

    #[test]
    fn test_importance_list_shape() {
        let prediction = predict(trained_session(), &waterfront()).unwrap();
        let list = &prediction.feature_importance;

        assert_eq!(list.len(), TOP_FEATURES);
        assert!(list.iter().all(|c| c.importance >= 0.0));
        assert!(list.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_waterfront_beats_rural() {
        let session = trained_session();
        let mut rural = waterfront();
        rural.insert("neighborhood".to_string(), json!("Rural"));

        let high = predict(session, &waterfront()).unwrap().predicted_price;
        let low = predict(session, &rural).unwrap().predicted_price;
        assert!(high > low, "waterfront {} <= rural {}", high, low);
    }
}
