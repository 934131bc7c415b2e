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

pub mod csv;
pub mod error;
pub mod synthetic;

pub use self::csv::{read_dataset, write_dataset};
pub use self::synthetic::{SyntheticHousing, generate};

use serde::{Deserialize, Serialize};

/// The neighborhoods a property can be located in.
///
/// The declaration order matches the ordinal code used by the feature encoder,
/// so `Downtown` encodes to `0` and `Waterfront` to `4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighborhood {
    Downtown,
    Suburb,
    Rural,
    Historic,
    Waterfront,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 5] = [
        Neighborhood::Downtown,
        Neighborhood::Suburb,
        Neighborhood::Rural,
        Neighborhood::Historic,
        Neighborhood::Waterfront,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Neighborhood::Downtown => "Downtown",
            Neighborhood::Suburb => "Suburb",
            Neighborhood::Rural => "Rural",
            Neighborhood::Historic => "Historic",
            Neighborhood::Waterfront => "Waterfront",
        }
    }

    /// Looks up a neighborhood by its exact, case-sensitive label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.label() == label)
    }

    pub fn code(self) -> u8 {
        match self {
            Neighborhood::Downtown => 0,
            Neighborhood::Suburb => 1,
            Neighborhood::Rural => 2,
            Neighborhood::Historic => 3,
            Neighborhood::Waterfront => 4,
        }
    }

    /// Multiplier applied to the synthetic sale price.
    pub fn price_factor(self) -> f64 {
        match self {
            Neighborhood::Downtown => 1.3,
            Neighborhood::Suburb => 1.0,
            Neighborhood::Rural => 0.6,
            Neighborhood::Historic => 1.4,
            Neighborhood::Waterfront => 1.8,
        }
    }
}

/// Overall condition of a property, from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl Condition {
    pub const ALL: [Condition; 5] =
        [Condition::Poor, Condition::Fair, Condition::Good, Condition::VeryGood, Condition::Excellent];

    pub fn label(self) -> &'static str {
        match self {
            Condition::Poor => "Poor",
            Condition::Fair => "Fair",
            Condition::Good => "Good",
            Condition::VeryGood => "Very Good",
            Condition::Excellent => "Excellent",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn code(self) -> u8 {
        match self {
            Condition::Poor => 0,
            Condition::Fair => 1,
            Condition::Good => 2,
            Condition::VeryGood => 3,
            Condition::Excellent => 4,
        }
    }
}

/// A single property description, either synthesized or received from a client.
///
/// Categorical fields keep the raw label rather than a parsed enum: clients may
/// send labels outside the known vocabulary and the encoder is responsible for
/// mapping those to a default code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    pub neighborhood: String,
    pub year_built: i64,
    pub sqft: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub overall_quality: i64,
    pub condition: String,
    pub garage_area: i64,
    pub has_pool: bool,
    pub has_basement: bool,
}

/// A housing record paired with its sale price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub features: HousingRecord,
    pub sale_price: i64,
}

/// Splits labeled records into their feature records and a target vector.
pub fn split_targets(records: &[LabeledRecord]) -> (Vec<HousingRecord>, ndarray::Array1<f64>) {
    let features = records.iter().map(|r| r.features.clone()).collect();
    let targets = records.iter().map(|r| r.sale_price as f64).collect();
    (features, targets)
}
