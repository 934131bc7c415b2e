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

//! The ordered feature schema shared by training and inference.
//!
//! Every numeric vector that flows into the preprocessor or the model is laid
//! out in the order of [`Feature::ALL`]. Columns are addressed through the
//! enum rather than bare indices so adding a feature cannot silently shift
//! the others.

use ndarray::{Array1, Array2};

use crate::data::{Condition, HousingRecord, Neighborhood};

/// Code used for a neighborhood label outside the known vocabulary.
pub const DEFAULT_NEIGHBORHOOD: Neighborhood = Neighborhood::Downtown;

/// Code used for a condition label outside the known vocabulary.
pub const DEFAULT_CONDITION: Condition = Condition::Good;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    YearBuilt,
    Sqft,
    Bedrooms,
    Bathrooms,
    OverallQuality,
    GarageArea,
    HasPool,
    HasBasement,
    Neighborhood,
    Condition,
}

impl Feature {
    pub const COUNT: usize = 10;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::YearBuilt,
        Feature::Sqft,
        Feature::Bedrooms,
        Feature::Bathrooms,
        Feature::OverallQuality,
        Feature::GarageArea,
        Feature::HasPool,
        Feature::HasBasement,
        Feature::Neighborhood,
        Feature::Condition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::YearBuilt => "year_built",
            Feature::Sqft => "sqft",
            Feature::Bedrooms => "bedrooms",
            Feature::Bathrooms => "bathrooms",
            Feature::OverallQuality => "overall_quality",
            Feature::GarageArea => "garage_area",
            Feature::HasPool => "has_pool",
            Feature::HasBasement => "has_basement",
            Feature::Neighborhood => "neighborhood",
            Feature::Condition => "condition",
        }
    }

    /// Column position of this feature in an encoded vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Raw (unscaled) numeric value of this feature for `record`.
    pub fn extract(self, record: &HousingRecord) -> f64 {
        match self {
            Feature::YearBuilt => record.year_built as f64,
            Feature::Sqft => record.sqft as f64,
            Feature::Bedrooms => record.bedrooms as f64,
            Feature::Bathrooms => record.bathrooms,
            Feature::OverallQuality => record.overall_quality as f64,
            Feature::GarageArea => record.garage_area as f64,
            Feature::HasPool => flag(record.has_pool),
            Feature::HasBasement => flag(record.has_basement),
            Feature::Neighborhood => neighborhood_code(&record.neighborhood),
            Feature::Condition => condition_code(&record.condition),
        }
    }
}

pub fn feature_names() -> Vec<&'static str> {
    Feature::ALL.iter().map(|f| f.name()).collect()
}

/// Ordinal code for a neighborhood label; unknown labels map to `Downtown` (0).
pub fn neighborhood_code(label: &str) -> f64 {
    Neighborhood::from_label(label).unwrap_or(DEFAULT_NEIGHBORHOOD).code() as f64
}

/// Ordinal code for a condition label; unknown labels map to `Good` (2).
pub fn condition_code(label: &str) -> f64 {
    Condition::from_label(label).unwrap_or(DEFAULT_CONDITION).code() as f64
}

#[inline(always)]
fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Encodes one record into its raw feature vector.
pub fn encode(record: &HousingRecord) -> Array1<f64> {
    Feature::ALL.iter().map(|f| f.extract(record)).collect()
}

/// Encodes records into a `(n_records, Feature::COUNT)` matrix.
pub fn encode_all(records: &[HousingRecord]) -> Array2<f64> {
    Array2::from_shape_fn((records.len(), Feature::COUNT), |(row, col)| {
        Feature::ALL[col].extract(&records[row])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HousingRecord {
        HousingRecord {
            neighborhood: "Historic".to_string(),
            year_built: 1985,
            sqft: 1800,
            bedrooms: 3,
            bathrooms: 2.5,
            overall_quality: 7,
            condition: "Fair".to_string(),
            garage_area: 320,
            has_pool: false,
            has_basement: true,
        }
    }

    #[test]
    fn test_schema_order_matches_indices() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(
            feature_names(),
            vec![
                "year_built",
                "sqft",
                "bedrooms",
                "bathrooms",
                "overall_quality",
                "garage_area",
                "has_pool",
                "has_basement",
                "neighborhood",
                "condition",
            ]
        );
    }

    #[test]
    fn test_encode_record() {
        let encoded = encode(&sample());
        assert_eq!(encoded.to_vec(), vec![1985.0, 1800.0, 3.0, 2.5, 7.0, 320.0, 0.0, 1.0, 3.0, 1.0]);
    }

    #[test]
    fn test_unknown_categories_use_defaults() {
        let mut record = sample();
        record.neighborhood = "Atlantis".to_string();
        record.condition = "Mint".to_string();

        let encoded = encode(&record);
        assert_eq!(encoded[Feature::Neighborhood.index()], 0.0);
        assert_eq!(encoded[Feature::Condition.index()], 2.0);
    }

    #[test]
    fn test_encode_all_matches_rows() {
        let mut other = sample();
        other.neighborhood = "Waterfront".to_string();
        other.condition = "Excellent".to_string();
        let records = vec![sample(), other];

        let matrix = encode_all(&records);
        assert_eq!(matrix.dim(), (2, Feature::COUNT));
        assert_eq!(matrix.row(0), encode(&records[0]));
        assert_eq!(matrix[[1, Feature::Neighborhood.index()]], 4.0);
        assert_eq!(matrix[[1, Feature::Condition.index()]], 4.0);
    }
}
