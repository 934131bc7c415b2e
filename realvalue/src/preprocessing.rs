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

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, info};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::HousingRecord;
use crate::errors::{PersistenceError, ScalerError};
use crate::features::{self, Feature};
use crate::scalers::{ColumnStats, Scaler, StandardScaler};

/// Encodes and standardizes housing records.
///
/// A `Preprocessor` only knows how to fit. Fitting consumes it and returns a
/// [`FittedPreprocessor`], which is the only type able to transform records,
/// so a transform can never run against missing statistics.
#[derive(Debug, Default)]
pub struct Preprocessor {
    scaler: StandardScaler<f64>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Preprocessor { scaler: StandardScaler::new() }
    }

    pub fn fit(mut self, records: &[HousingRecord]) -> Result<FittedPreprocessor, ScalerError> {
        let encoded = features::encode_all(records);
        self.scaler.fit(&encoded)?;
        debug!("Fitted preprocessor on {} records", records.len());
        Ok(FittedPreprocessor { scaler: self.scaler })
    }

    /// Fits on `records` and returns the scaled training matrix alongside the
    /// fitted preprocessor.
    pub fn fit_transform(
        self,
        records: &[HousingRecord],
    ) -> Result<(FittedPreprocessor, Array2<f64>), ScalerError> {
        let fitted = self.fit(records)?;
        let scaled = fitted.transform_batch(records)?;
        Ok((fitted, scaled))
    }
}

/// Immutable encoding and scaling state learned from a training set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    scaler: StandardScaler<f64>,
}

impl FittedPreprocessor {
    /// Encodes and standardizes a single record in [`Feature::ALL`] order.
    pub fn transform(&self, record: &HousingRecord) -> Result<Array1<f64>, ScalerError> {
        let row = features::encode(record).insert_axis(Axis(0));
        let scaled = self.scaler.transform(&row)?;
        Ok(scaled.remove_axis(Axis(0)))
    }

    pub fn transform_batch(&self, records: &[HousingRecord]) -> Result<Array2<f64>, ScalerError> {
        if records.is_empty() {
            return Err(ScalerError::EmptyInput);
        }
        self.scaler.transform(&features::encode_all(records))
    }

    pub fn stats(&self) -> Result<&ColumnStats<f64>, ScalerError> {
        self.scaler.stats().ok_or(ScalerError::NotFitted)
    }

    /// Mean and standard deviation recorded for one feature.
    pub fn feature_stats(&self, feature: Feature) -> Result<(f64, f64), ScalerError> {
        let stats = self.stats()?;
        Ok((stats.mean[feature.index()], stats.std[feature.index()]))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!("Saved preprocessor to {:?}", path);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }
}
