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

use thiserror::Error;

use crate::data::error::DataError;

#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Input data has no feature columns")]
    NoFeatures,

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum LossError {
    #[error("Predictions or actuals are empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Predictions or actuals contain NaN or infinite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Loss error: {0}")]
    Loss(#[from] LossError),

    #[error("Training data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Training data contains NaN or infinite values")]
    InvalidNumericValue,

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Failures of a single prediction request.
///
/// `MissingField` is the caller's fault and is reported back verbatim. The
/// other variants are internal and only their category reaches the caller.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Malformed value for `{field}`: {reason}")]
    Malformed { field: &'static str, reason: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl PredictionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PredictionError::MissingField(_))
    }
}

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Preprocessing error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
