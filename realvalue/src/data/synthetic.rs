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

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::error::DataError;
use super::{Condition, HousingRecord, LabeledRecord, Neighborhood};

const BATHROOM_CHOICES: [f64; 7] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];

const BASE_PRICE: f64 = 5_000_000.0;
const MIN_SALE_PRICE: f64 = 2_500_000.0;

/// Configuration for the synthetic housing dataset.
#[derive(Debug, Clone)]
pub struct SyntheticHousing {
    n_samples: usize,
    seed: u64,
}

impl Default for SyntheticHousing {
    fn default() -> Self {
        SyntheticHousing { n_samples: 1000, seed: 42 }
    }
}

impl SyntheticHousing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws `n_samples` labeled records.
    ///
    /// Every field is drawn independently per record, then the sale price is
    /// synthesized from a linear formula with Gaussian noise, scaled by the
    /// neighborhood factor and floored at the minimum sale price. The same
    /// seed always yields the same records.
    pub fn generate(&self) -> Result<Vec<LabeledRecord>, DataError> {
        if self.n_samples == 0 {
            return Err(DataError::InvalidSampleCount(self.n_samples));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let sqft_dist: Normal<f64> = Normal::new(2000.0, 800.0)?;
        let noise_dist: Normal<f64> = Normal::new(0.0, 2_000_000.0)?;

        let records: Vec<LabeledRecord> = (0..self.n_samples)
            .map(|_| {
                let neighborhood = Neighborhood::ALL[rng.gen_range(0..Neighborhood::ALL.len())];
                let features = HousingRecord {
                    neighborhood: neighborhood.label().to_string(),
                    year_built: rng.gen_range(1960..=2023),
                    sqft: sqft_dist.sample(&mut rng).max(0.0) as i64,
                    bedrooms: rng.gen_range(1..=5),
                    bathrooms: BATHROOM_CHOICES[rng.gen_range(0..BATHROOM_CHOICES.len())],
                    overall_quality: rng.gen_range(1..=10),
                    condition: Condition::ALL[rng.gen_range(0..Condition::ALL.len())]
                        .label()
                        .to_string(),
                    garage_area: rng.gen_range(0..=999),
                    has_pool: rng.gen_bool(0.5),
                    has_basement: rng.gen_bool(0.5),
                };
                let noise = noise_dist.sample(&mut rng);
                let sale_price = sale_price(&features, neighborhood, noise);
                LabeledRecord { features, sale_price }
            })
            .collect();

        debug!("Generated {} synthetic records with seed {}", records.len(), self.seed);
        Ok(records)
    }
}

/// Generates `n` labeled records from `seed`.
pub fn generate(n: usize, seed: u64) -> Result<Vec<LabeledRecord>, DataError> {
    SyntheticHousing::new().with_samples(n).with_seed(seed).generate()
}

fn sale_price(record: &HousingRecord, neighborhood: Neighborhood, noise: f64) -> i64 {
    let price = BASE_PRICE
        + (record.year_built - 1960) as f64 * 50_000.0
        + record.sqft as f64 * 8_000.0
        + record.bedrooms as f64 * 1_500_000.0
        + record.bathrooms * 800_000.0
        + record.overall_quality as f64 * 1_000_000.0
        + record.garage_area as f64 * 5_000.0
        + if record.has_pool { 2_500_000.0 } else { 0.0 }
        + if record.has_basement { 1_500_000.0 } else { 0.0 }
        + noise;

    (price * neighborhood.price_factor()).max(MIN_SALE_PRICE).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(neighborhood: Neighborhood) -> HousingRecord {
        HousingRecord {
            neighborhood: neighborhood.label().to_string(),
            year_built: 1960,
            sqft: 1000,
            bedrooms: 2,
            bathrooms: 1.5,
            overall_quality: 5,
            condition: "Good".to_string(),
            garage_area: 100,
            has_pool: true,
            has_basement: false,
        }
    }

    #[test]
    fn test_generate_is_reproducible() {
        let first = generate(200, 7).unwrap();
        let second = generate(200, 7).unwrap();
        assert_eq!(first, second);

        let other = generate(200, 8).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_generate_rejects_zero_samples() {
        let result = SyntheticHousing::new().with_samples(0).generate();
        assert!(matches!(result, Err(DataError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_generated_fields_stay_in_range() {
        let records = SyntheticHousing::new().generate().unwrap();
        assert_eq!(records.len(), 1000);

        for r in &records {
            let f = &r.features;
            assert!(r.sale_price >= 2_500_000, "price below floor: {}", r.sale_price);
            assert!((1960..=2023).contains(&f.year_built));
            assert!(f.sqft >= 0);
            assert!((1..=5).contains(&f.bedrooms));
            assert!(BATHROOM_CHOICES.contains(&f.bathrooms));
            assert!((1..=10).contains(&f.overall_quality));
            assert!((0..=999).contains(&f.garage_area));
            assert!(Neighborhood::from_label(&f.neighborhood).is_some());
            assert!(Condition::from_label(&f.condition).is_some());
        }
    }

    #[test]
    fn test_generate_covers_every_category() {
        let records = generate(500, 42).unwrap();
        for n in Neighborhood::ALL {
            assert!(records.iter().any(|r| r.features.neighborhood == n.label()));
        }
        for c in Condition::ALL {
            assert!(records.iter().any(|r| r.features.condition == c.label()));
        }
    }

    #[test]
    fn test_sale_price_formula() {
        // 5M + 0 + 8M + 3M + 1.2M + 5M + 0.5M + 2.5M = 25.2M
        let suburb = sale_price(&record(Neighborhood::Suburb), Neighborhood::Suburb, 0.0);
        assert_eq!(suburb, 25_200_000);

        let waterfront =
            sale_price(&record(Neighborhood::Waterfront), Neighborhood::Waterfront, 0.0);
        assert_eq!(waterfront, 45_360_000);
    }

    #[test]
    fn test_sale_price_is_floored() {
        let price = sale_price(&record(Neighborhood::Rural), Neighborhood::Rural, -30_000_000.0);
        assert_eq!(price, 2_500_000);
    }
}
