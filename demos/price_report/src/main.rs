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

use realvalue::data::HousingRecord;
use realvalue::features::Feature;
use realvalue::prediction::PricePrediction;
use realvalue::{TrainingConfig, TrainingSession};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Train on the default synthetic dataset
    let config = TrainingConfig::default();
    let session = tokio::task::spawn_blocking(move || TrainingSession::train(&config))
        .await
        .expect("Training task panicked")
        .expect("Failed to train model");

    let metrics = session.metrics();
    println!("Trained on {} samples", metrics.samples);
    println!("RMSE: {:.0}", metrics.rmse);
    println!("R²:   {:.4}", metrics.r2);

    println!("\nFeature importance:");
    for (feature, weight) in session.importances() {
        println!("  {:<16} {:.4}", feature.name(), weight);
    }

    let house = HousingRecord {
        neighborhood: "Historic".to_string(),
        year_built: 1925,
        sqft: 2400,
        bedrooms: 4,
        bathrooms: 2.5,
        overall_quality: 8,
        garage_area: 250,
        has_pool: false,
        has_basement: true,
        condition: "Very Good".to_string(),
    };
    let price = session.predict(&house).expect("Prediction failed");
    let report = PricePrediction::from_estimate(price, &session.importances(), metrics);

    println!("\nSample house in {} ({} sqft)", house.neighborhood, house.sqft);
    println!("Predicted price: ${:.2}", report.predicted_price);
    println!(
        "Interval: ${:.2} .. ${:.2} (confidence {})",
        report.confidence_interval.lower, report.confidence_interval.upper, report.confidence
    );
    for contribution in &report.feature_importance {
        println!("  {:<16} {:>14.2}", contribution.feature, contribution.contribution);
    }

    let (mean, std) = session
        .preprocessor()
        .feature_stats(Feature::Sqft)
        .expect("Preprocessor is fitted");
    println!("\nTraining sqft: mean {:.1}, std {:.1}", mean, std);
}
